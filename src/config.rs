//! Bridge configuration.

use gibind_core::{HeapLimits, PropertyFlags};

/// Global name of the function class unless configured otherwise.
pub const DEFAULT_FUNCTION_CLASS_NAME: &str = "IntrospectedFunction";

/// Settings for a [`BridgeContext`](crate::BridgeContext).
///
/// ```
/// use gibind::BridgeConfig;
/// use gibind_core::HeapLimits;
///
/// let config = BridgeConfig::new()
///     .with_heap_limits(HeapLimits { max_objects: 1024, ..HeapLimits::default() })
///     .with_function_class_name("Function");
/// assert_eq!(config.function_class_name(), "Function");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    property_flags: PropertyFlags,
    heap_limits: HeapLimits,
    function_class_name: String,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self {
            property_flags: PropertyFlags::MODULE,
            heap_limits: HeapLimits::default(),
            function_class_name: DEFAULT_FUNCTION_CLASS_NAME.to_string(),
        }
    }

    /// Flags for functions, enumerations, enum values and namespaces.
    pub fn with_property_flags(mut self, flags: PropertyFlags) -> Self {
        self.property_flags = flags;
        self
    }

    pub fn with_heap_limits(mut self, limits: HeapLimits) -> Self {
        self.heap_limits = limits;
        self
    }

    pub fn with_function_class_name<S: Into<String>>(mut self, name: S) -> Self {
        self.function_class_name = name.into();
        self
    }

    pub fn property_flags(&self) -> PropertyFlags {
        self.property_flags
    }

    pub fn heap_limits(&self) -> HeapLimits {
        self.heap_limits
    }

    pub fn function_class_name(&self) -> &str {
        &self.function_class_name
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.property_flags(), PropertyFlags::PERMANENT | PropertyFlags::ENUMERATE);
        assert_eq!(config.heap_limits(), HeapLimits::default());
        assert_eq!(config.function_class_name(), "IntrospectedFunction");
    }

    #[test]
    fn builder_overrides() {
        let config = BridgeConfig::new().with_property_flags(PropertyFlags::READ_ONLY);
        assert_eq!(config.property_flags(), PropertyFlags::READ_ONLY);
    }
}
