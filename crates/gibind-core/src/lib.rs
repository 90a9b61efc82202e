//! Data model for the gibind marshaling core.
//!
//! Both sides of the boundary live here: script values ([`Dynamic`],
//! [`ObjectHeap`]), native values ([`NativeArg`], [`NativeHeap`]), and the
//! introspection vocabulary that describes how to move between them
//! ([`CallableInfo`], [`TypeDescriptor`], [`EnumDescriptor`]).

pub mod entries;
pub mod error;
pub mod runtime;
pub mod types;

mod qualified_name;
mod type_hash;

pub use entries::{ArgDescriptor, CallableDescriptor, CallableInfo, EnumDescriptor, EnumValue};
pub use error::{BridgeError, BridgeResult, CallableKind, ConversionError, NativeError};
pub use qualified_name::QualifiedName;
pub use runtime::{
    Dynamic, HeapLimits, HeapStats, NativeArg, NativeCall, NativeCallable, NativeData, NativeFn,
    NativeHeap, NativePtr, ObjectHandle, ObjectHeap, ObjectKind, OutCell, Property, ScriptObject,
};
pub use type_hash::{TypeHash, hash_constants};
pub use types::{
    Direction, FunctionFlags, OwnershipMode, PropertyFlags, TypeDescriptor, TypeTag,
};
