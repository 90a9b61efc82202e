//! Enumeration descriptors.

use crate::{QualifiedName, TypeHash};

use super::EnumValue;

/// Introspection data for an enumeration or flags type.
///
/// Values keep their declaration order; the binder defines them in that
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Qualified name, e.g. `Gtk.Orientation`.
    pub name: QualifiedName,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    /// Bit flags rather than a plain enumeration.
    pub is_flags: bool,
    pub values: Vec<EnumValue>,
}

impl EnumDescriptor {
    /// Create an empty enumeration.
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        let name = name.into();
        let type_hash = name.to_type_hash();
        Self {
            name,
            type_hash,
            is_flags: false,
            values: Vec::new(),
        }
    }

    /// Create an empty flags type.
    pub fn flags(name: impl Into<QualifiedName>) -> Self {
        Self {
            is_flags: true,
            ..Self::new(name)
        }
    }

    /// Add a value to the enum.
    pub fn with_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.values.push(EnumValue::new(name, value));
        self
    }

    /// Add multiple values to the enum.
    pub fn with_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = (S, i64)>) -> Self {
        for (name, value) in values {
            self.values.push(EnumValue::new(name, value));
        }
        self
    }

    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    /// Look up a value by name.
    pub fn get_value(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// Look up a name by value.
    pub fn get_name(&self, value: i64) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }

    pub fn contains_value(&self, value: i64) -> bool {
        self.values.iter().any(|v| v.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_descriptor_creation() {
        let desc = EnumDescriptor::new("Gtk.Orientation")
            .with_value("HORIZONTAL", 0)
            .with_value("VERTICAL", 1);

        assert_eq!(desc.simple_name(), "Orientation");
        assert_eq!(desc.name.namespace_string(), "Gtk");
        assert_eq!(desc.values.len(), 2);
        assert!(!desc.is_flags);
        assert_eq!(desc.type_hash, TypeHash::from_name("Gtk.Orientation"));
    }

    #[test]
    fn enum_descriptor_lookups() {
        let desc = EnumDescriptor::new("Demo.Status")
            .with_value("PENDING", 0)
            .with_value("ACTIVE", 1);

        assert_eq!(desc.get_value("ACTIVE"), Some(1));
        assert_eq!(desc.get_value("UNKNOWN"), None);
        assert_eq!(desc.get_name(0), Some("PENDING"));
        assert_eq!(desc.get_name(99), None);
        assert!(desc.contains_value(1));
    }

    #[test]
    fn flags_with_values() {
        let desc = EnumDescriptor::flags("Demo.Mode").with_values([("READ", 1), ("WRITE", 2)]);

        assert!(desc.is_flags);
        assert_eq!(desc.get_value("WRITE"), Some(2));
    }
}
