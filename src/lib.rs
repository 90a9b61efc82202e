//! Argument marshaling and invocation core for introspection-driven script
//! bindings.
//!
//! The bridge exposes natively implemented functions and enumerations,
//! described by an introspection [`Repository`](gibind_registry::Repository),
//! as script values:
//!
//! - [`define_function`] / [`call_function`]: function objects and calls
//! - [`invoke`](invoke::invoke): the marshaling pipeline behind every call
//! - [`define_enumeration`] / [`lookup_enumeration`]: enum objects
//! - [`BridgeContext::resolve`]: lazy definition by namespace and name
//!
//! # Example
//!
//! ```
//! use gibind::prelude::*;
//!
//! let mut ctx = BridgeContext::new();
//! let add = CallableDescriptor::new("Calc.add", |call: &mut NativeCall<'_>| {
//!     let x = call.int(0)?;
//!     call.set_out(0, NativeArg::Int(2))?;
//!     Ok(NativeArg::Int(x + 2))
//! })
//! .in_arg("x", TypeTag::Int32)
//! .out_arg("carry", TypeTag::Int32, OwnershipMode::None)
//! .returns(TypeTag::Int32, OwnershipMode::None);
//!
//! let value = gibind::invoke::invoke(&mut ctx, &add, None, &[Dynamic::Int(5)]).unwrap();
//! let array = value.as_object().unwrap();
//! assert_eq!(
//!     ctx.objects().get(array).unwrap().elements(),
//!     Some(&[Dynamic::Int(7), Dynamic::Int(2)][..])
//! );
//! ```

mod class;
mod config;
mod context;
mod enumeration;
mod function;
pub mod invoke;

pub use class::{ensure_function_class, is_function_prototype};
pub use config::{BridgeConfig, DEFAULT_FUNCTION_CLASS_NAME};
pub use context::BridgeContext;
pub use enumeration::{define_enumeration, lookup_enumeration};
pub use function::{call_function, define_function, new_function};

pub mod prelude {
    pub use crate::{
        BridgeConfig, BridgeContext, call_function, define_enumeration, define_function,
        lookup_enumeration,
    };
    pub use gibind_core::{
        ArgDescriptor, BridgeError, BridgeResult, CallableDescriptor, CallableInfo,
        ConversionError, Direction, Dynamic, EnumDescriptor, NativeArg, NativeCall, NativeError,
        NativePtr, ObjectHandle, OwnershipMode, PropertyFlags, QualifiedName, TypeDescriptor,
        TypeTag,
    };
    pub use gibind_registry::{ConverterRegistry, MarshalContext, Repository, TypeConverter};
}
