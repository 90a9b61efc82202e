//! ConverterRegistry - type tag to converter dispatch.
//!
//! The invocation engine never matches on type tags itself. Every argument,
//! return value and output goes through the converter registered for its
//! [`TypeTag`], so supporting a new family of types means registering one
//! more [`TypeConverter`].
//!
//! # Example
//!
//! ```
//! use gibind_core::TypeTag;
//! use gibind_registry::ConverterRegistry;
//!
//! let registry = ConverterRegistry::with_defaults();
//! assert!(registry.contains(TypeTag::Int32));
//! assert!(registry.contains(TypeTag::Utf8));
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use gibind_core::{ConversionError, TypeTag};

use crate::TypeConverter;
use crate::convert::{
    ArrayConverter, BooleanConverter, EnumConverter, FloatConverter, IntegerConverter,
    ObjectConverter, StringConverter, VoidConverter,
};

/// Converter table keyed by type tag.
#[derive(Default, Clone)]
pub struct ConverterRegistry {
    converters: FxHashMap<TypeTag, Arc<dyn TypeConverter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in converters for every tag.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(TypeTag::Void, VoidConverter);
        registry.register(TypeTag::Boolean, BooleanConverter);

        let integers: Arc<dyn TypeConverter> = Arc::new(IntegerConverter);
        for tag in [
            TypeTag::Int8,
            TypeTag::UInt8,
            TypeTag::Int16,
            TypeTag::UInt16,
            TypeTag::Int32,
            TypeTag::UInt32,
            TypeTag::Int64,
            TypeTag::UInt64,
        ] {
            registry.register_shared(tag, Arc::clone(&integers));
        }

        let floats: Arc<dyn TypeConverter> = Arc::new(FloatConverter);
        registry.register_shared(TypeTag::Float, Arc::clone(&floats));
        registry.register_shared(TypeTag::Double, floats);

        let strings: Arc<dyn TypeConverter> = Arc::new(StringConverter);
        registry.register_shared(TypeTag::Utf8, Arc::clone(&strings));
        registry.register_shared(TypeTag::Filename, strings);

        let arrays: Arc<dyn TypeConverter> = Arc::new(ArrayConverter);
        registry.register_shared(TypeTag::Array, Arc::clone(&arrays));
        registry.register_shared(TypeTag::List, arrays);

        let enums: Arc<dyn TypeConverter> = Arc::new(EnumConverter);
        registry.register_shared(TypeTag::Enum, Arc::clone(&enums));
        registry.register_shared(TypeTag::Flags, enums);

        let objects: Arc<dyn TypeConverter> = Arc::new(ObjectConverter);
        registry.register_shared(TypeTag::Object, Arc::clone(&objects));
        registry.register_shared(TypeTag::Boxed, objects);

        registry
    }

    /// Register a converter, replacing any previous one for `tag`.
    pub fn register<C>(&mut self, tag: TypeTag, converter: C) -> Option<Arc<dyn TypeConverter>>
    where
        C: TypeConverter + 'static,
    {
        self.register_shared(tag, Arc::new(converter))
    }

    /// Register an already shared converter.
    pub fn register_shared(
        &mut self,
        tag: TypeTag,
        converter: Arc<dyn TypeConverter>,
    ) -> Option<Arc<dyn TypeConverter>> {
        self.converters.insert(tag, converter)
    }

    /// Converter for `tag`.
    pub fn lookup(&self, tag: TypeTag) -> Result<&Arc<dyn TypeConverter>, ConversionError> {
        self.converters
            .get(&tag)
            .ok_or(ConversionError::Unsupported { tag })
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.converters.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&'static str> = self.converters.keys().map(|t| t.name()).collect();
        tags.sort_unstable();
        f.debug_struct("ConverterRegistry").field("tags", &tags).finish()
    }
}
