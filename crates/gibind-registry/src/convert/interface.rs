//! Enumerations, flags, objects and boxed values.

use tracing::trace;

use gibind_core::{
    ConversionError, Dynamic, NativeArg, NativePtr, ObjectKind, OwnershipMode, ScriptObject,
    TypeDescriptor, TypeTag,
};

use super::expect_pointer;
use crate::{MarshalContext, TypeConverter};

/// Enum and flags values travel as plain integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumConverter;

impl TypeConverter for EnumConverter {
    fn to_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        let target = ty.tag.name();
        match value {
            Dynamic::Int(i) => Ok(NativeArg::Int(*i)),
            Dynamic::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(NativeArg::Int(*f as i64)),
            Dynamic::Float(f) => Err(ConversionError::FloatConversion { value: *f, target }),
            other => Err(ConversionError::TypeMismatch {
                expected: target,
                actual: other.type_name(),
            }),
        }
    }

    fn from_native(
        &self,
        _cx: &mut MarshalContext<'_>,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        match slot {
            NativeArg::Int(i) => Ok(Dynamic::Int(*i)),
            NativeArg::UInt(u) => i64::try_from(*u)
                .map(Dynamic::Int)
                .map_err(|_| ConversionError::IntegerOverflow {
                    value: i128::from(*u),
                    target: ty.tag.name(),
                }),
            other => Err(ConversionError::TypeMismatch {
                expected: ty.tag.name(),
                actual: other.kind_name(),
            }),
        }
    }
}

/// Wrapper objects over native instances and boxed values.
///
/// Passing a wrapper in takes one native reference for the slot. The bridge
/// drops it after the call, or the callee keeps it when the parameter
/// transfers ownership. Lifting a pointer creates a fresh wrapper that holds
/// one native reference of its own; releasing with any transferring mode
/// drops one reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectConverter;

impl TypeConverter for ObjectConverter {
    fn to_native(
        &self,
        cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        let target = ty.tag.name();
        let handle = match value {
            Dynamic::Object(handle) => *handle,
            Dynamic::Null | Dynamic::Undefined => return Ok(NativeArg::Pointer(NativePtr::NULL)),
            other => {
                return Err(ConversionError::TypeMismatch {
                    expected: target,
                    actual: other.type_name(),
                });
            }
        };

        let object = cx
            .objects
            .get(handle)
            .ok_or(ConversionError::StaleHandle {
                index: handle.index,
            })?;

        let (type_name, type_hash, native) = match object.kind() {
            ObjectKind::Instance {
                type_name,
                type_hash,
                native,
            }
            | ObjectKind::Boxed {
                type_name,
                type_hash,
                native,
            } => (type_name, *type_hash, *native),
            other => {
                return Err(ConversionError::TypeMismatch {
                    expected: target,
                    actual: other.name(),
                });
            }
        };

        if let Some(expected) = &ty.interface
            && ty.interface_hash() != type_hash
        {
            return Err(ConversionError::WrongInterface {
                expected: expected.clone(),
                actual: type_name.clone(),
            });
        }

        if !cx.native.is_live(native) {
            return Err(ConversionError::DanglingPointer {
                pointer: native.addr(),
                target,
            });
        }

        cx.native.add_ref(native);
        Ok(NativeArg::Pointer(native))
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

        let (type_name, type_hash) = cx
            .native
            .type_of(ptr)
            .map(|(name, hash)| (name.clone(), hash))
            .ok_or(ConversionError::DanglingPointer {
                pointer: ptr.addr(),
                target,
            })?;

        let kind = match ty.tag {
            TypeTag::Boxed => ObjectKind::Boxed {
                type_name,
                type_hash,
                native: ptr,
            },
            _ => ObjectKind::Instance {
                type_name,
                type_hash,
                native: ptr,
            },
        };

        cx.native.add_ref(ptr);
        match cx.objects.allocate(ScriptObject::new(kind)) {
            Ok(handle) => {
                trace!(pointer = ?ptr, ?handle, "wrapped native object");
                Ok(Dynamic::Object(handle))
            }
            Err(err) => {
                cx.native.unref(ptr);
                Err(ConversionError::failed(err.to_string()))
            }
        }
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

        trace!(pointer = ?ptr, %mode, "dropping native reference");
        match cx.native.unref(ptr) {
            Some(_) => Ok(()),
            None => Err(ConversionError::DanglingPointer {
                pointer: ptr.addr(),
                target,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::test_support::Fixture;

    struct Widget;

    #[test]
    fn lift_wraps_and_refs() {
        let mut fx = Fixture::new();
        let ptr = fx.native.new_instance("Demo.Widget", Widget);
        let ty = TypeDescriptor::object("Demo.Widget");

        let value = fx.cx().from_native(&NativeArg::Pointer(ptr), &ty).unwrap();
        let handle = value.as_object().unwrap();
        assert_eq!(fx.objects.get(handle).unwrap().native(), Some(ptr));
        assert_eq!(fx.native.ref_count(ptr), Some(2));

        fx.cx()
            .release(OwnershipMode::Everything, &ty, &NativeArg::Pointer(ptr))
            .unwrap();
        assert_eq!(fx.native.ref_count(ptr), Some(1));
    }

    #[test]
    fn wrapper_round_trips_to_pointer() {
        let mut fx = Fixture::new();
        let ptr = fx.native.new_instance("Demo.Widget", Widget);
        let ty = TypeDescriptor::object("Demo.Widget");
        let value = fx.cx().from_native(&NativeArg::Pointer(ptr), &ty).unwrap();

        assert_eq!(fx.cx().to_native(&value, &ty), Ok(NativeArg::Pointer(ptr)));
        assert_eq!(fx.native.ref_count(ptr), Some(3));
    }

    #[test]
    fn passing_in_then_releasing_is_balanced() {
        let mut fx = Fixture::new();
        let ptr = fx.native.new_instance("Demo.Widget", Widget);
        let ty = TypeDescriptor::object("Demo.Widget");
        let value = fx.cx().from_native(&NativeArg::Pointer(ptr), &ty).unwrap();

        for _ in 0..3 {
            let slot = fx.cx().to_native(&value, &ty).unwrap();
            fx.cx().release(OwnershipMode::Everything, &ty, &slot).unwrap();
        }
        assert_eq!(fx.native.ref_count(ptr), Some(2));
    }

    #[test]
    fn wrong_interface_is_rejected() {
        let mut fx = Fixture::new();
        let ptr = fx.native.new_instance("Demo.Widget", Widget);
        let value = fx
            .cx()
            .from_native(&NativeArg::Pointer(ptr), &TypeDescriptor::object("Demo.Widget"))
            .unwrap();

        let result = fx.cx().to_native(&value, &TypeDescriptor::object("Demo.Window"));
        assert!(matches!(result, Err(ConversionError::WrongInterface { .. })));
    }

    #[test]
    fn plain_object_is_not_a_wrapper() {
        let mut fx = Fixture::new();
        let handle = fx.objects.new_plain().unwrap();
        let result = fx
            .cx()
            .to_native(&Dynamic::Object(handle), &TypeDescriptor::object("Demo.Widget"));
        assert!(matches!(result, Err(ConversionError::TypeMismatch { .. })));
    }

    #[test]
    fn enums_are_integers() {
        let mut fx = Fixture::new();
        let ty = TypeDescriptor::enumeration("Demo.Mode");
        assert_eq!(fx.cx().to_native(&Dynamic::Int(2), &ty), Ok(NativeArg::Int(2)));
        assert_eq!(
            fx.cx().from_native(&NativeArg::Int(2), &ty),
            Ok(Dynamic::Int(2))
        );
        assert!(fx.cx().to_native(&Dynamic::Float(1.5), &ty).is_err());
    }
}
