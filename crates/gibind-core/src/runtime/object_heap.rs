//! Generational arena for engine objects.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{Dynamic, NativePtr};
use crate::error::{BridgeError, BridgeResult};
use crate::{CallableInfo, PropertyFlags, QualifiedName, TypeHash};

/// Handle to an engine object.
///
/// The generation detects handles that outlived their object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub index: u32,
    pub generation: u32,
}

impl ObjectHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// What an engine object is, beyond its property table.
pub enum ObjectKind {
    /// Namespace objects, enum objects, the global object
    Plain,
    /// Ordered sequence, used for multi-value call results
    Array(Vec<Dynamic>),
    /// Callable wrapper. `None` marks the class prototype, which is callable
    /// but bound to no native function.
    Function(Option<Arc<dyn CallableInfo>>),
    /// Wrapper holding one reference on a native object instance
    Instance {
        type_name: QualifiedName,
        type_hash: TypeHash,
        native: NativePtr,
    },
    /// Wrapper holding one reference on a native boxed value
    Boxed {
        type_name: QualifiedName,
        type_hash: TypeHash,
        native: NativePtr,
    },
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Plain => "object",
            ObjectKind::Array(_) => "array",
            ObjectKind::Function(_) => "function",
            ObjectKind::Instance { .. } => "instance",
            ObjectKind::Boxed { .. } => "boxed",
        }
    }
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Plain => write!(f, "Plain"),
            ObjectKind::Array(values) => write!(f, "Array({:?})", values),
            ObjectKind::Function(Some(info)) => write!(f, "Function({})", info.name()),
            ObjectKind::Function(None) => write!(f, "Function(<prototype>)"),
            ObjectKind::Instance {
                type_name, native, ..
            } => write!(f, "Instance({} @ {:?})", type_name, native),
            ObjectKind::Boxed {
                type_name, native, ..
            } => write!(f, "Boxed({} @ {:?})", type_name, native),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub value: Dynamic,
    pub flags: PropertyFlags,
}

#[derive(Debug)]
pub struct ScriptObject {
    kind: ObjectKind,
    prototype: Option<ObjectHandle>,
    properties: FxHashMap<String, Property>,
}

impl ScriptObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            prototype: None,
            properties: FxHashMap::default(),
        }
    }

    pub fn plain() -> Self {
        Self::new(ObjectKind::Plain)
    }

    pub fn with_prototype(mut self, prototype: ObjectHandle) -> Self {
        self.prototype = Some(prototype);
        self
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn prototype(&self) -> Option<ObjectHandle> {
        self.prototype
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Native pointer wrapped by an instance or boxed object.
    pub fn native(&self) -> Option<NativePtr> {
        match &self.kind {
            ObjectKind::Instance { native, .. } | ObjectKind::Boxed { native, .. } => Some(*native),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[Dynamic]> {
        match &self.kind {
            ObjectKind::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// Limits that make engine resource failures observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapLimits {
    pub max_objects: usize,
    /// Maximum number of properties on a single object
    pub max_properties: usize,
}

impl Default for HeapLimits {
    fn default() -> Self {
        Self {
            max_objects: usize::MAX,
            max_properties: usize::MAX,
        }
    }
}

struct HeapSlot {
    generation: u32,
    value: Option<ScriptObject>,
    ref_count: u32,
}

/// Engine object storage with generational indices and reference counts.
pub struct ObjectHeap {
    slots: Vec<HeapSlot>,
    free_list: Vec<u32>,
    live: usize,
    limits: HeapLimits,
}

impl ObjectHeap {
    pub fn new() -> Self {
        Self::with_limits(HeapLimits::default())
    }

    pub fn with_limits(limits: HeapLimits) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            limits,
        }
    }

    pub fn limits(&self) -> HeapLimits {
        self.limits
    }

    /// Allocate an object with one reference.
    pub fn allocate(&mut self, object: ScriptObject) -> BridgeResult<ObjectHandle> {
        if self.live >= self.limits.max_objects {
            return Err(BridgeError::resource(
                object.kind.name(),
                "object heap limit reached",
            ));
        }

        Ok(self.allocate_root(object))
    }

    /// Allocate without checking the object limit.
    ///
    /// Used for engine roots such as the global object, which must exist for
    /// any heap configuration.
    pub fn allocate_root(&mut self, object: ScriptObject) -> ObjectHandle {
        self.live += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(object);
            slot.ref_count = 1;
            return ObjectHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(HeapSlot {
            generation: 0,
            value: Some(object),
            ref_count: 1,
        });
        ObjectHandle::new(index, 0)
    }

    pub fn new_plain(&mut self) -> BridgeResult<ObjectHandle> {
        self.allocate(ScriptObject::plain())
    }

    pub fn new_array(&mut self, values: Vec<Dynamic>) -> BridgeResult<ObjectHandle> {
        self.allocate(ScriptObject::new(ObjectKind::Array(values)))
    }

    /// Returns None for a stale handle.
    pub fn get(&self, handle: ObjectHandle) -> Option<&ScriptObject> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut ScriptObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn try_get(&self, handle: ObjectHandle) -> BridgeResult<&ScriptObject> {
        self.get(handle).ok_or(BridgeError::StaleObject {
            index: handle.index,
        })
    }

    pub fn add_ref(&mut self, handle: ObjectHandle) -> bool {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.value.is_some()
        {
            slot.ref_count = slot.ref_count.saturating_add(1);
            return true;
        }
        false
    }

    /// Drop one reference. Returns the object when this was the last one.
    pub fn release(&mut self, handle: ObjectHandle) -> Option<ScriptObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }

        slot.ref_count = slot.ref_count.saturating_sub(1);
        if slot.ref_count > 0 {
            return None;
        }

        let object = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.live -= 1;
        object
    }

    pub fn ref_count(&self, handle: ObjectHandle) -> Option<u32> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation == handle.generation && slot.value.is_some() {
            Some(slot.ref_count)
        } else {
            None
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Define or replace a property.
    ///
    /// Returns the value a replacement displaced; the caller owns any object
    /// it refers to. Fails when the object is stale, when it would exceed the
    /// property limit, or when the existing property is permanent and the new
    /// value differs from the stored one.
    pub fn define_property(
        &mut self,
        handle: ObjectHandle,
        name: &str,
        value: Dynamic,
        flags: PropertyFlags,
    ) -> BridgeResult<Option<Dynamic>> {
        let max_properties = self.limits.max_properties;
        let object = self.get_mut(handle).ok_or(BridgeError::StaleObject {
            index: handle.index,
        })?;

        match object.properties.get_mut(name) {
            Some(existing) if existing.flags.contains(PropertyFlags::PERMANENT) => {
                if existing.value != value {
                    return Err(BridgeError::resource(name, "property is permanent"));
                }
                Ok(None)
            }
            Some(existing) if existing.value == value => {
                existing.flags = flags;
                Ok(None)
            }
            Some(existing) => {
                let old = std::mem::replace(existing, Property { value, flags });
                Ok(Some(old.value))
            }
            None => {
                if object.properties.len() >= max_properties {
                    return Err(BridgeError::resource(name, "property limit reached"));
                }
                object
                    .properties
                    .insert(name.to_string(), Property { value, flags });
                Ok(None)
            }
        }
    }

    pub fn get_property(&self, handle: ObjectHandle, name: &str) -> Option<&Dynamic> {
        self.get(handle)?.property(name).map(|p| &p.value)
    }

    pub fn has_property(&self, handle: ObjectHandle, name: &str) -> bool {
        self.get_property(handle, name).is_some()
    }
}

impl Default for ObjectHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeap")
            .field("slot_count", &self.slots.len())
            .field("live", &self.live)
            .field("free_count", &self.free_list.len())
            .finish()
    }
}
