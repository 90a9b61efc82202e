//! Type tags and type descriptors supplied by the introspection layer.

use std::fmt;

use crate::{QualifiedName, TypeHash};

/// Storage class of an introspected type.
///
/// Converters are registered per tag, so adding a tag never touches the
/// invocation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Void,
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    Utf8,
    Filename,
    Array,
    List,
    Enum,
    Flags,
    Object,
    Boxed,
}

impl TypeTag {
    /// C-side spelling of the tag, used in conversion errors.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Boolean => "gboolean",
            TypeTag::Int8 => "gint8",
            TypeTag::UInt8 => "guint8",
            TypeTag::Int16 => "gint16",
            TypeTag::UInt16 => "guint16",
            TypeTag::Int32 => "gint32",
            TypeTag::UInt32 => "guint32",
            TypeTag::Int64 => "gint64",
            TypeTag::UInt64 => "guint64",
            TypeTag::Float => "gfloat",
            TypeTag::Double => "gdouble",
            TypeTag::Utf8 => "utf8",
            TypeTag::Filename => "filename",
            TypeTag::Array => "array",
            TypeTag::List => "list",
            TypeTag::Enum => "enum",
            TypeTag::Flags => "flags",
            TypeTag::Object => "object",
            TypeTag::Boxed => "boxed",
        }
    }

    /// Inclusive bounds for the integer tags.
    pub const fn integer_range(self) -> Option<(i128, i128)> {
        match self {
            TypeTag::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            TypeTag::UInt8 => Some((0, u8::MAX as i128)),
            TypeTag::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            TypeTag::UInt16 => Some((0, u16::MAX as i128)),
            TypeTag::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            TypeTag::UInt32 => Some((0, u32::MAX as i128)),
            TypeTag::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            TypeTag::UInt64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            TypeTag::UInt8 | TypeTag::UInt16 | TypeTag::UInt32 | TypeTag::UInt64
        )
    }

    /// Tags whose native value is a pointer to memory the bridge may own.
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            TypeTag::Utf8
                | TypeTag::Filename
                | TypeTag::Array
                | TypeTag::List
                | TypeTag::Object
                | TypeTag::Boxed
        )
    }

    pub const fn is_container(self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::List)
    }

    pub const fn is_interface(self) -> bool {
        matches!(
            self,
            TypeTag::Enum | TypeTag::Flags | TypeTag::Object | TypeTag::Boxed
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The native type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub tag: TypeTag,
    /// Element type for [`TypeTag::Array`] and [`TypeTag::List`]
    pub element: Option<Box<TypeDescriptor>>,
    /// Interface name for enums, flags, objects and boxed types
    pub interface: Option<QualifiedName>,
}

impl TypeDescriptor {
    pub fn of(tag: TypeTag) -> Self {
        Self {
            tag,
            element: None,
            interface: None,
        }
    }

    pub fn void() -> Self {
        Self::of(TypeTag::Void)
    }

    pub fn array_of(element: TypeDescriptor) -> Self {
        Self {
            tag: TypeTag::Array,
            element: Some(Box::new(element)),
            interface: None,
        }
    }

    pub fn list_of(element: TypeDescriptor) -> Self {
        Self {
            tag: TypeTag::List,
            element: Some(Box::new(element)),
            interface: None,
        }
    }

    pub fn interface(tag: TypeTag, name: impl Into<QualifiedName>) -> Self {
        Self {
            tag,
            element: None,
            interface: Some(name.into()),
        }
    }

    pub fn object(name: impl Into<QualifiedName>) -> Self {
        Self::interface(TypeTag::Object, name)
    }

    pub fn boxed(name: impl Into<QualifiedName>) -> Self {
        Self::interface(TypeTag::Boxed, name)
    }

    pub fn enumeration(name: impl Into<QualifiedName>) -> Self {
        Self::interface(TypeTag::Enum, name)
    }

    pub fn is_void(&self) -> bool {
        self.tag == TypeTag::Void
    }

    pub fn element(&self) -> Option<&TypeDescriptor> {
        self.element.as_deref()
    }

    /// Hash of the interface name, or [`TypeHash::EMPTY`] for non-interface types.
    pub fn interface_hash(&self) -> TypeHash {
        self.interface
            .as_ref()
            .map_or(TypeHash::EMPTY, QualifiedName::to_type_hash)
    }
}

impl From<TypeTag> for TypeDescriptor {
    fn from(tag: TypeTag) -> Self {
        TypeDescriptor::of(tag)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.element, &self.interface) {
            (Some(element), _) => write!(f, "{}<{}>", self.tag, element),
            (None, Some(name)) => write!(f, "{}", name),
            (None, None) => write!(f, "{}", self.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ranges() {
        assert_eq!(TypeTag::UInt8.integer_range(), Some((0, 255)));
        assert_eq!(TypeTag::Int16.integer_range(), Some((-32768, 32767)));
        assert_eq!(TypeTag::Utf8.integer_range(), None);
    }

    #[test]
    fn descriptor_display() {
        assert_eq!(TypeDescriptor::of(TypeTag::Int32).to_string(), "gint32");
        assert_eq!(
            TypeDescriptor::array_of(TypeTag::Utf8.into()).to_string(),
            "array<utf8>"
        );
        assert_eq!(TypeDescriptor::object("Gio.File").to_string(), "Gio.File");
    }

    #[test]
    fn interface_hash_matches_name() {
        let ty = TypeDescriptor::object("Gio.File");
        assert_eq!(ty.interface_hash(), TypeHash::from_name("Gio.File"));
        assert!(TypeDescriptor::void().interface_hash().is_empty());
    }
}
