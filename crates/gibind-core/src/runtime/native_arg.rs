//! Native argument slots.

use std::fmt;

/// Address of a block in the [`NativeHeap`](super::NativeHeap).
///
/// Address 0 is the null pointer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct NativePtr(pub(crate) u32);

impl NativePtr {
    pub const NULL: NativePtr = NativePtr(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn addr(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NativePtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("NULL")
        } else {
            write!(f, "0x{:08x}", self.0)
        }
    }
}

/// Address of an out-value cell in a native argument frame.
///
/// Out and InOut parameters are passed by address: the out slot (and, for
/// InOut, the in slot) holds an `OutCell`, and the callee reads or writes the
/// cell it names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OutCell(usize);

impl OutCell {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// One native argument slot, the analogue of a C argument union.
///
/// Integer widths are not stored; the parameter's type tag gives them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NativeArg {
    #[default]
    Void,
    Boolean(bool),
    /// Signed integers of every width, enums and flags
    Int(i64),
    /// Unsigned integers of every width
    UInt(u64),
    Float(f32),
    Double(f64),
    /// Strings, arrays, lists, objects and boxed values
    Pointer(NativePtr),
    /// Pass-by-address slot for Out and InOut parameters
    Address(OutCell),
}

impl NativeArg {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NativeArg::Void => "void",
            NativeArg::Boolean(_) => "boolean",
            NativeArg::Int(_) => "int",
            NativeArg::UInt(_) => "uint",
            NativeArg::Float(_) => "float",
            NativeArg::Double(_) => "double",
            NativeArg::Pointer(_) => "pointer",
            NativeArg::Address(_) => "address",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeArg::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Signed view of an integer slot; unsigned values above `i64::MAX` do not fit.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            NativeArg::Int(v) => Some(*v),
            NativeArg::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            NativeArg::UInt(v) => Some(*v),
            NativeArg::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            NativeArg::Double(v) => Some(*v),
            NativeArg::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<NativePtr> {
        match self {
            NativeArg::Pointer(ptr) => Some(*ptr),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<OutCell> {
        match self {
            NativeArg::Address(cell) => Some(*cell),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_views() {
        assert_eq!(NativeArg::Int(-3).as_int(), Some(-3));
        assert_eq!(NativeArg::Int(-3).as_uint(), None);
        assert_eq!(NativeArg::UInt(u64::MAX).as_int(), None);
        assert_eq!(NativeArg::UInt(7).as_int(), Some(7));
    }

    #[test]
    fn float_widens_to_double() {
        assert_eq!(NativeArg::Float(1.5).as_double(), Some(1.5));
        assert_eq!(NativeArg::Boolean(true).as_double(), None);
    }

    #[test]
    fn null_pointer() {
        assert!(NativePtr::NULL.is_null());
        assert_eq!(format!("{:?}", NativePtr::NULL), "NULL");
        assert_eq!(NativeArg::default(), NativeArg::Void);
    }
}
