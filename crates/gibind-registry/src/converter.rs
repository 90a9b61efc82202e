//! The type-conversion capability and the context it runs in.

use std::fmt;

use tracing::trace;

use gibind_core::{
    ConversionError, Dynamic, NativeArg, NativeHeap, ObjectHandle, ObjectHeap, OwnershipMode,
    TypeDescriptor,
};

use crate::ConverterRegistry;

/// Converts one family of introspected types across the boundary.
///
/// A converter is chosen by the [`TypeTag`](gibind_core::TypeTag) of the
/// descriptor it is handed; the descriptor carries the element type of
/// containers and the interface name of objects.
pub trait TypeConverter: fmt::Debug {
    /// Script value to native slot.
    ///
    /// Anything the converter allocates is owned by the returned slot and is
    /// given back through [`release`](Self::release).
    fn to_native(
        &self,
        cx: &mut MarshalContext<'_>,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError>;

    /// Native slot to script value. Never frees the slot.
    fn from_native(
        &self,
        cx: &mut MarshalContext<'_>,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError>;

    /// Give back native memory held by `slot` according to `mode`.
    ///
    /// Scalars own nothing, so the default does nothing.
    fn release(
        &self,
        cx: &mut MarshalContext<'_>,
        mode: OwnershipMode,
        ty: &TypeDescriptor,
        slot: &NativeArg,
    ) -> Result<(), ConversionError> {
        let _ = (cx, mode, ty, slot);
        Ok(())
    }
}

/// Everything a converter may touch while it runs.
///
/// Converters for containers recurse through the `to_native`/`from_native`/
/// `release` methods here so element types dispatch through the same
/// registry.
pub struct MarshalContext<'a> {
    pub objects: &'a mut ObjectHeap,
    pub native: &'a mut NativeHeap,
    converters: &'a ConverterRegistry,
}

impl<'a> MarshalContext<'a> {
    pub fn new(
        objects: &'a mut ObjectHeap,
        native: &'a mut NativeHeap,
        converters: &'a ConverterRegistry,
    ) -> Self {
        Self {
            objects,
            native,
            converters,
        }
    }

    pub fn converters(&self) -> &'a ConverterRegistry {
        self.converters
    }

    pub fn to_native(
        &mut self,
        value: &Dynamic,
        ty: &TypeDescriptor,
    ) -> Result<NativeArg, ConversionError> {
        let converters = self.converters;
        converters.lookup(ty.tag)?.to_native(self, value, ty)
    }

    pub fn from_native(
        &mut self,
        slot: &NativeArg,
        ty: &TypeDescriptor,
    ) -> Result<Dynamic, ConversionError> {
        let converters = self.converters;
        converters.lookup(ty.tag)?.from_native(self, slot, ty)
    }

    pub fn release(
        &mut self,
        mode: OwnershipMode,
        ty: &TypeDescriptor,
        slot: &NativeArg,
    ) -> Result<(), ConversionError> {
        if !mode.transfers() {
            return Ok(());
        }
        let converters = self.converters;
        converters.lookup(ty.tag)?.release(self, mode, ty, slot)
    }

    /// Drop one engine reference to `handle`.
    ///
    /// When the object dies, objects it holds (array elements and property
    /// values) are released in turn, and a wrapper gives back its native
    /// reference. Returns true when `handle` itself was freed.
    pub fn release_object(&mut self, handle: ObjectHandle) -> bool {
        let mut pending = vec![handle];
        let mut freed_root = false;

        while let Some(next) = pending.pop() {
            let Some(object) = self.objects.release(next) else {
                continue;
            };
            freed_root |= next == handle;

            if let Some(ptr) = object.native() {
                trace!(pointer = ?ptr, "wrapper released native reference");
                self.native.unref(ptr);
            }

            if let Some(elements) = object.elements() {
                pending.extend(elements.iter().filter_map(Dynamic::as_object));
            }
            pending.extend(
                object
                    .property_names()
                    .filter_map(|name| object.property(name))
                    .filter_map(|prop| prop.value.as_object()),
            );
        }

        freed_root
    }

    /// Drop engine objects lifted by a conversion that is being abandoned.
    pub fn discard(&mut self, values: &[Dynamic]) {
        for handle in values.iter().filter_map(Dynamic::as_object) {
            self.release_object(handle);
        }
    }

    /// Element descriptor of a container type.
    pub fn element_of<'t>(ty: &'t TypeDescriptor) -> Result<&'t TypeDescriptor, ConversionError> {
        ty.element()
            .ok_or(ConversionError::MissingElementType { tag: ty.tag })
    }
}

impl fmt::Debug for MarshalContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshalContext")
            .field("objects", &self.objects)
            .field("native", &self.native)
            .finish_non_exhaustive()
    }
}
