//! UTF-8 and filename strings.

use tracing::trace;

use gibind_core::{
    ConversionError, Dynamic, NativeArg, NativePtr, OwnershipMode, TypeDescriptor,
};

use super::expect_pointer;
use crate::{MarshalContext, TypeConverter};

/// Strings are copied into a fresh native block on the way in and copied
/// out on the way back. `null` and `undefined` map to the null pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl TypeConverter for StringConverter {
    fn to_native(
        &self,
        cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        match value {
            Dynamic::String(s) => Ok(NativeArg::Pointer(cx.native.alloc_string(s.as_str()))),
            Dynamic::Null | Dynamic::Undefined => Ok(NativeArg::Pointer(NativePtr::NULL)),
            other => Err(ConversionError::TypeMismatch {
                expected: ty.tag.name(),
                actual: other.type_name(),
            }),
        }
    }

    fn from_native(
        &self,
        cx: &mut MarshalContext<'_>,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        let target = ty.tag.name();
        let ptr = expect_pointer(slot, target)?;
        if ptr.is_null() {
            return Ok(Dynamic::Null);
        }

        cx.native
            .string(ptr)
            .map(Dynamic::from)
            .ok_or(ConversionError::DanglingPointer {
                pointer: ptr.addr(),
                target,
            })
    }

    fn release(
        &self,
        cx: &mut MarshalContext<'_>,
        mode: OwnershipMode,
        ty: &TypeDescriptor,
        slot: &NativeArg,
    ) -> Result<(), ConversionError> {
        let target = ty.tag.name();
        let ptr = expect_pointer(slot, target)?;
        if !mode.transfers() || ptr.is_null() {
            return Ok(());
        }

        trace!(pointer = ?ptr, %mode, "freeing string");
        match cx.native.free(ptr) {
            Some(_) => Ok(()),
            None => Err(ConversionError::DanglingPointer {
                pointer: ptr.addr(),
                target,
            }),
        }
    }
}
