//! Native-side memory: the blocks a C library hands across the boundary.
//!
//! Every block is reference counted. Strings, arrays and lists are created
//! with one reference and freed outright; instances and boxed values are
//! shared and die when the last reference goes. All frees and unrefs are
//! counted in [`HeapStats`], and a free of a dead address is counted as an
//! invalid free instead of being ignored.

use std::any::Any;
use std::fmt;

use rustc_hash::FxHashMap;

use super::{NativeArg, NativePtr};
use crate::{QualifiedName, TypeHash};

/// Contents of a native block.
pub enum NativeData {
    String(String),
    Array(Vec<NativeArg>),
    List(Vec<NativeArg>),
    Instance {
        type_name: QualifiedName,
        type_hash: TypeHash,
        state: Box<dyn Any>,
    },
    Boxed {
        type_name: QualifiedName,
        type_hash: TypeHash,
        state: Box<dyn Any>,
    },
}

impl NativeData {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NativeData::String(_) => "string",
            NativeData::Array(_) => "array",
            NativeData::List(_) => "list",
            NativeData::Instance { .. } => "instance",
            NativeData::Boxed { .. } => "boxed",
        }
    }
}

impl fmt::Debug for NativeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeData::String(s) => write!(f, "String({:?})", s),
            NativeData::Array(items) => write!(f, "Array({:?})", items),
            NativeData::List(items) => write!(f, "List({:?})", items),
            NativeData::Instance { type_name, .. } => write!(f, "Instance({})", type_name),
            NativeData::Boxed { type_name, .. } => write!(f, "Boxed({})", type_name),
        }
    }
}

/// Allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub allocations: u64,
    pub frees: u64,
    pub refs: u64,
    pub unrefs: u64,
    /// Frees or unrefs of an address that was not live
    pub invalid_frees: u64,
}

struct Block {
    data: NativeData,
    refs: u32,
}

/// Reference-counted native memory addressed by [`NativePtr`].
pub struct NativeHeap {
    blocks: FxHashMap<u32, Block>,
    next: u32,
    stats: HeapStats,
}

impl NativeHeap {
    pub fn new() -> Self {
        Self {
            blocks: FxHashMap::default(),
            next: 1,
            stats: HeapStats::default(),
        }
    }

    /// Allocate a block with one reference. Addresses are never reused.
    pub fn alloc(&mut self, data: NativeData) -> NativePtr {
        let addr = self.next;
        self.next = self.next.wrapping_add(1).max(1);
        self.blocks.insert(addr, Block { data, refs: 1 });
        self.stats.allocations += 1;
        NativePtr(addr)
    }

    pub fn alloc_string(&mut self, value: impl Into<String>) -> NativePtr {
        self.alloc(NativeData::String(value.into()))
    }

    pub fn alloc_array(&mut self, items: Vec<NativeArg>) -> NativePtr {
        self.alloc(NativeData::Array(items))
    }

    pub fn alloc_list(&mut self, items: Vec<NativeArg>) -> NativePtr {
        self.alloc(NativeData::List(items))
    }

    /// Create an object instance of the given native type.
    pub fn new_instance<T: Any>(&mut self, type_name: impl Into<QualifiedName>, state: T) -> NativePtr {
        let type_name = type_name.into();
        let type_hash = type_name.to_type_hash();
        self.alloc(NativeData::Instance {
            type_name,
            type_hash,
            state: Box::new(state),
        })
    }

    pub fn new_boxed<T: Any>(&mut self, type_name: impl Into<QualifiedName>, state: T) -> NativePtr {
        let type_name = type_name.into();
        let type_hash = type_name.to_type_hash();
        self.alloc(NativeData::Boxed {
            type_name,
            type_hash,
            state: Box::new(state),
        })
    }

    pub fn get(&self, ptr: NativePtr) -> Option<&NativeData> {
        self.blocks.get(&ptr.0).map(|block| &block.data)
    }

    pub fn get_mut(&mut self, ptr: NativePtr) -> Option<&mut NativeData> {
        self.blocks.get_mut(&ptr.0).map(|block| &mut block.data)
    }

    pub fn string(&self, ptr: NativePtr) -> Option<&str> {
        match self.get(ptr)? {
            NativeData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Items of an array or list block.
    pub fn items(&self, ptr: NativePtr) -> Option<&[NativeArg]> {
        match self.get(ptr)? {
            NativeData::Array(items) | NativeData::List(items) => Some(items),
            _ => None,
        }
    }

    /// Type name and hash of an instance or boxed block.
    pub fn type_of(&self, ptr: NativePtr) -> Option<(&QualifiedName, TypeHash)> {
        match self.get(ptr)? {
            NativeData::Instance {
                type_name,
                type_hash,
                ..
            }
            | NativeData::Boxed {
                type_name,
                type_hash,
                ..
            } => Some((type_name, *type_hash)),
            _ => None,
        }
    }

    pub fn state<T: Any>(&self, ptr: NativePtr) -> Option<&T> {
        match self.get(ptr)? {
            NativeData::Instance { state, .. } | NativeData::Boxed { state, .. } => {
                state.downcast_ref::<T>()
            }
            _ => None,
        }
    }

    pub fn state_mut<T: Any>(&mut self, ptr: NativePtr) -> Option<&mut T> {
        match self.get_mut(ptr)? {
            NativeData::Instance { state, .. } | NativeData::Boxed { state, .. } => {
                state.downcast_mut::<T>()
            }
            _ => None,
        }
    }

    pub fn is_live(&self, ptr: NativePtr) -> bool {
        self.blocks.contains_key(&ptr.0)
    }

    pub fn ref_count(&self, ptr: NativePtr) -> Option<u32> {
        self.blocks.get(&ptr.0).map(|block| block.refs)
    }

    /// Take an extra reference. Returns false for a dead address.
    pub fn add_ref(&mut self, ptr: NativePtr) -> bool {
        match self.blocks.get_mut(&ptr.0) {
            Some(block) => {
                block.refs = block.refs.saturating_add(1);
                self.stats.refs += 1;
                true
            }
            None => false,
        }
    }

    /// Drop one reference, freeing the block when none remain.
    ///
    /// Returns the remaining count, or `None` if the address was not live.
    pub fn unref(&mut self, ptr: NativePtr) -> Option<u32> {
        let Some(block) = self.blocks.get_mut(&ptr.0) else {
            self.stats.invalid_frees += 1;
            return None;
        };

        self.stats.unrefs += 1;
        block.refs = block.refs.saturating_sub(1);
        let remaining = block.refs;

        if remaining == 0 {
            self.blocks.remove(&ptr.0);
            self.stats.frees += 1;
        }

        Some(remaining)
    }

    /// Free a block regardless of its reference count.
    pub fn free(&mut self, ptr: NativePtr) -> Option<NativeData> {
        match self.blocks.remove(&ptr.0) {
            Some(block) => {
                self.stats.frees += 1;
                Some(block.data)
            }
            None => {
                self.stats.invalid_frees += 1;
                None
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }
}

impl Default for NativeHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NativeHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHeap")
            .field("live", &self.blocks.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_alloc_and_free() {
        let mut heap = NativeHeap::new();
        let ptr = heap.alloc_string("hello");

        assert!(!ptr.is_null());
        assert_eq!(heap.string(ptr), Some("hello"));

        assert!(heap.free(ptr).is_some());
        assert!(!heap.is_live(ptr));
        assert_eq!(heap.stats().frees, 1);
    }

    #[test]
    fn double_free_is_counted() {
        let mut heap = NativeHeap::new();
        let ptr = heap.alloc_string("x");

        heap.free(ptr);
        assert!(heap.free(ptr).is_none());
        assert_eq!(heap.stats().invalid_frees, 1);
    }

    #[test]
    fn instance_ref_counting() {
        let mut heap = NativeHeap::new();
        let ptr = heap.new_instance("Gio.File", 42u32);

        assert!(heap.add_ref(ptr));
        assert_eq!(heap.ref_count(ptr), Some(2));

        assert_eq!(heap.unref(ptr), Some(1));
        assert_eq!(heap.state::<u32>(ptr), Some(&42));

        assert_eq!(heap.unref(ptr), Some(0));
        assert!(!heap.is_live(ptr));
        assert_eq!(heap.unref(ptr), None);
    }

    #[test]
    fn type_of_instance() {
        let mut heap = NativeHeap::new();
        let ptr = heap.new_boxed("GLib.Variant", ());
        let (name, hash) = heap.type_of(ptr).unwrap();

        assert_eq!(name.to_string(), "GLib.Variant");
        assert_eq!(hash, TypeHash::from_name("GLib.Variant"));
        let s = heap.alloc_string("s");
        assert!(heap.type_of(s).is_none());
    }

    #[test]
    fn addresses_are_not_reused() {
        let mut heap = NativeHeap::new();
        let first = heap.alloc_string("a");
        heap.free(first);
        let second = heap.alloc_string("b");
        assert_ne!(first, second);
        assert!(!heap.is_live(first));
    }
}
