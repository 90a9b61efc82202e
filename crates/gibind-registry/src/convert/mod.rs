//! Built-in converters.
//!
//! | Converter | Tags | Owns native memory |
//! |---|---|---|
//! | [`VoidConverter`] | `Void` | no |
//! | [`BooleanConverter`] | `Boolean` | no |
//! | [`IntegerConverter`] | `Int8` .. `UInt64` | no |
//! | [`FloatConverter`] | `Float`, `Double` | no |
//! | [`StringConverter`] | `Utf8`, `Filename` | the string |
//! | [`ArrayConverter`] | `Array`, `List` | the container, optionally its elements |
//! | [`EnumConverter`] | `Enum`, `Flags` | no |
//! | [`ObjectConverter`] | `Object`, `Boxed` | one reference |

mod containers;
mod interface;
mod primitives;
mod strings;

pub use containers::ArrayConverter;
pub use interface::{EnumConverter, ObjectConverter};
pub use primitives::{BooleanConverter, FloatConverter, IntegerConverter, VoidConverter};
pub use strings::StringConverter;

use gibind_core::{ConversionError, NativeArg, NativePtr};

/// Pointer held by a slot of a pointer-typed value.
pub(crate) fn expect_pointer(
    slot: &NativeArg,
    target: &'static str,
) -> Result<NativePtr, ConversionError> {
    slot.as_pointer().ok_or(ConversionError::TypeMismatch {
        expected: target,
        actual: slot.kind_name(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use gibind_core::{HeapLimits, NativeHeap, ObjectHeap};

    use crate::{ConverterRegistry, MarshalContext};

    /// Owns everything a `MarshalContext` borrows.
    pub struct Fixture {
        pub objects: ObjectHeap,
        pub native: NativeHeap,
        pub converters: ConverterRegistry,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                objects: ObjectHeap::new(),
                native: NativeHeap::new(),
                converters: ConverterRegistry::with_defaults(),
            }
        }

        pub fn with_limits(limits: HeapLimits) -> Self {
            Self {
                objects: ObjectHeap::with_limits(limits),
                ..Self::new()
            }
        }

        pub fn cx(&mut self) -> MarshalContext<'_> {
            MarshalContext::new(&mut self.objects, &mut self.native, &self.converters)
        }
    }
}
