//! Parameter descriptors shared by callable entries.

use crate::{Direction, OwnershipMode, TypeDescriptor};

/// One declared parameter of an introspected callable.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDescriptor {
    /// Parameter name, used in diagnostics.
    pub name: String,
    pub direction: Direction,
    pub ty: TypeDescriptor,
    /// Who owns the native value after the call.
    pub transfer: OwnershipMode,
}

impl ArgDescriptor {
    pub fn new(
        name: impl Into<String>,
        direction: Direction,
        ty: impl Into<TypeDescriptor>,
        transfer: OwnershipMode,
    ) -> Self {
        Self {
            name: name.into(),
            direction,
            ty: ty.into(),
            transfer,
        }
    }

    /// An `In` parameter the callee does not take ownership of.
    pub fn input(name: impl Into<String>, ty: impl Into<TypeDescriptor>) -> Self {
        Self::new(name, Direction::In, ty, OwnershipMode::None)
    }

    pub fn output(
        name: impl Into<String>,
        ty: impl Into<TypeDescriptor>,
        transfer: OwnershipMode,
    ) -> Self {
        Self::new(name, Direction::Out, ty, transfer)
    }

    pub fn in_out(
        name: impl Into<String>,
        ty: impl Into<TypeDescriptor>,
        transfer: OwnershipMode,
    ) -> Self {
        Self::new(name, Direction::InOut, ty, transfer)
    }

    pub fn with_transfer(mut self, transfer: OwnershipMode) -> Self {
        self.transfer = transfer;
        self
    }
}

/// A named value of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Integer value.
    pub value: i64,
}

impl EnumValue {
    /// Create a new enum value.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeTag;

    #[test]
    fn arg_constructors() {
        let a = ArgDescriptor::input("a", TypeTag::Int32);
        assert_eq!(a.direction, Direction::In);
        assert_eq!(a.transfer, OwnershipMode::None);

        let b = ArgDescriptor::output("b", TypeTag::Utf8, OwnershipMode::Everything);
        assert!(b.direction.is_out());
        assert!(!b.direction.is_in());

        let c = ArgDescriptor::in_out("c", TypeTag::Int32, OwnershipMode::None);
        assert!(c.direction.is_in() && c.direction.is_out());
    }

    #[test]
    fn enum_value_creation() {
        let value = EnumValue::new("Red", 0);
        assert_eq!(value.name, "Red");
        assert_eq!(value.value, 0);
    }
}
