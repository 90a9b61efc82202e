//! Arrays and lists with typed elements.

use tracing::trace;

use gibind_core::{
    ConversionError, Dynamic, NativeArg, NativePtr, OwnershipMode, TypeDescriptor, TypeTag,
};

use super::expect_pointer;
use crate::{MarshalContext, TypeConverter};

/// Converts between engine array objects and native arrays or lists.
///
/// Elements go through the registry using the descriptor's element type.
/// Release with `Container` frees only the container block; `Everything`
/// also releases each element with `Everything`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayConverter;

impl ArrayConverter {
    /// Give back elements converted before a failure.
    fn unwind(cx: &mut MarshalContext<'_>, element: &TypeDescriptor, converted: &[NativeArg]) {
        for slot in converted {
            // Already failing; the original error is the one reported.
            let _ = cx.release(OwnershipMode::Everything, element, slot);
        }
    }
}

impl TypeConverter for ArrayConverter {
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

        let element = MarshalContext::element_of(ty)?;
        let object = cx
            .objects
            .get(handle)
            .ok_or(ConversionError::StaleHandle {
                index: handle.index,
            })?;
        let values = object
            .elements()
            .ok_or(ConversionError::TypeMismatch {
                expected: target,
                actual: object.kind().name(),
            })?
            .to_vec();

        let mut items = Vec::with_capacity(values.len());
        for value in &values {
            match cx.to_native(value, element) {
                Ok(slot) => items.push(slot),
                Err(err) => {
                    Self::unwind(cx, element, &items);
                    return Err(err);
                }
            }
        }

        let ptr = match ty.tag {
            TypeTag::List => cx.native.alloc_list(items),
            _ => cx.native.alloc_array(items),
        };
        Ok(NativeArg::Pointer(ptr))
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

        let element = MarshalContext::element_of(ty)?;
        let items = cx
            .native
            .items(ptr)
            .ok_or(ConversionError::DanglingPointer {
                pointer: ptr.addr(),
                target,
            })?
            .to_vec();

        let mut values = Vec::with_capacity(items.len());
        for item in &items {
            match cx.from_native(item, element) {
                Ok(value) => values.push(value),
                Err(err) => {
                    cx.discard(&values);
                    return Err(err);
                }
            }
        }

        match cx.objects.new_array(values.clone()) {
            Ok(handle) => Ok(Dynamic::Object(handle)),
            Err(err) => {
                cx.discard(&values);
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

        let dangling = ConversionError::DanglingPointer {
            pointer: ptr.addr(),
            target,
        };

        let mut first_error = None;
        if mode == OwnershipMode::Everything {
            let element = MarshalContext::element_of(ty)?;
            let items = cx.native.items(ptr).ok_or_else(|| dangling.clone())?.to_vec();
            trace!(pointer = ?ptr, count = items.len(), "releasing container elements");
            for item in &items {
                if let Err(err) = cx.release(OwnershipMode::Everything, element, item) {
                    first_error.get_or_insert(err);
                }
            }
        }

        trace!(pointer = ?ptr, "freeing container");
        if cx.native.free(ptr).is_none() {
            first_error.get_or_insert(dangling);
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::test_support::Fixture;
    use gibind_core::HeapLimits;

    fn strings_array() -> TypeDescriptor {
        TypeDescriptor::array_of(TypeTag::Utf8.into())
    }

    #[test]
    fn array_to_native_converts_elements() {
        let mut fx = Fixture::new();
        let handle = fx
            .objects
            .new_array(vec![Dynamic::from("a"), Dynamic::from("b")])
            .unwrap();

        let slot = fx
            .cx()
            .to_native(&Dynamic::Object(handle), &strings_array())
            .unwrap();
        let ptr = slot.as_pointer().unwrap();
        let items = fx.native.items(ptr).unwrap().to_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(fx.native.string(items[1].as_pointer().unwrap()), Some("b"));
        assert_eq!(fx.native.live_count(), 3);
    }

    #[test]
    fn element_failure_releases_converted_elements() {
        let mut fx = Fixture::new();
        let handle = fx
            .objects
            .new_array(vec![Dynamic::from("a"), Dynamic::Int(3)])
            .unwrap();

        let result = fx.cx().to_native(&Dynamic::Object(handle), &strings_array());
        assert!(result.is_err());
        assert_eq!(fx.native.live_count(), 0);
        assert_eq!(fx.native.stats().frees, 1);
    }

    #[test]
    fn from_native_builds_array_object() {
        let mut fx = Fixture::new();
        let ty = TypeDescriptor::list_of(TypeTag::Int32.into());
        let ptr = fx
            .native
            .alloc_list(vec![NativeArg::Int(1), NativeArg::Int(2)]);

        let value = fx.cx().from_native(&NativeArg::Pointer(ptr), &ty).unwrap();
        let handle = value.as_object().unwrap();
        assert_eq!(
            fx.objects.get(handle).unwrap().elements(),
            Some(&[Dynamic::Int(1), Dynamic::Int(2)][..])
        );
    }

    #[test]
    fn element_failure_drops_lifted_wrappers() {
        let mut fx = Fixture::new();
        let live = fx.native.new_instance("Demo.Widget", ());
        let dead = fx.native.new_instance("Demo.Widget", ());
        fx.native.unref(dead);
        let ptr = fx
            .native
            .alloc_array(vec![NativeArg::Pointer(live), NativeArg::Pointer(dead)]);
        let ty = TypeDescriptor::array_of(TypeDescriptor::object("Demo.Widget"));

        let result = fx.cx().from_native(&NativeArg::Pointer(ptr), &ty);

        assert!(matches!(result, Err(ConversionError::DanglingPointer { .. })));
        assert_eq!(fx.native.ref_count(live), Some(1));
        assert_eq!(fx.objects.live_count(), 0);
    }

    #[test]
    fn array_limit_drops_lifted_wrappers() {
        let mut fx = Fixture::with_limits(HeapLimits {
            max_objects: 1,
            ..Default::default()
        });
        let widget = fx.native.new_instance("Demo.Widget", ());
        let ptr = fx.native.alloc_array(vec![NativeArg::Pointer(widget)]);
        let ty = TypeDescriptor::array_of(TypeDescriptor::object("Demo.Widget"));

        let result = fx.cx().from_native(&NativeArg::Pointer(ptr), &ty);

        assert!(matches!(result, Err(ConversionError::Failed { .. })));
        assert_eq!(fx.native.ref_count(widget), Some(1));
        assert_eq!(fx.objects.live_count(), 0);
    }

    #[test]
    fn container_release_keeps_elements() {
        let mut fx = Fixture::new();
        let a = fx.native.alloc_string("a");
        let ptr = fx.native.alloc_array(vec![NativeArg::Pointer(a)]);

        fx.cx()
            .release(OwnershipMode::Container, &strings_array(), &NativeArg::Pointer(ptr))
            .unwrap();
        assert!(!fx.native.is_live(ptr));
        assert!(fx.native.is_live(a));
    }

    #[test]
    fn everything_release_frees_elements() {
        let mut fx = Fixture::new();
        let a = fx.native.alloc_string("a");
        let b = fx.native.alloc_string("b");
        let ptr = fx
            .native
            .alloc_array(vec![NativeArg::Pointer(a), NativeArg::Pointer(b)]);

        fx.cx()
            .release(OwnershipMode::Everything, &strings_array(), &NativeArg::Pointer(ptr))
            .unwrap();
        assert_eq!(fx.native.live_count(), 0);
        assert_eq!(fx.native.stats().frees, 3);
        assert_eq!(fx.native.stats().invalid_frees, 0);
    }

    #[test]
    fn missing_element_type() {
        let mut fx = Fixture::new();
        let handle = fx.objects.new_array(Vec::new()).unwrap();
        let ty = TypeDescriptor::of(TypeTag::Array);
        assert_eq!(
            fx.cx().to_native(&Dynamic::Object(handle), &ty),
            Err(ConversionError::MissingElementType {
                tag: TypeTag::Array
            })
        );
    }
}
