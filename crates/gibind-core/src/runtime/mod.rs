//! Runtime values on both sides of the boundary.
//!
//! ## Key Types
//!
//! - [`Dynamic`]: script-side value
//! - [`ObjectHeap`]: engine objects (plain, array, function, wrappers)
//! - [`NativeArg`]: one native argument slot
//! - [`NativeHeap`]: native memory with reference counts and release stats
//! - [`NativeCall`]: what a native function sees of its argument frame
//! - [`NativeFn`]: type-erased native function

mod call_context;
mod dynamic;
mod native_arg;
mod native_fn;
mod native_heap;
mod object_heap;

pub use call_context::NativeCall;
pub use dynamic::Dynamic;
pub use native_arg::{NativeArg, NativePtr, OutCell};
pub use native_fn::{NativeCallable, NativeFn};
pub use native_heap::{HeapStats, NativeData, NativeHeap};
pub use object_heap::{HeapLimits, ObjectHandle, ObjectHeap, ObjectKind, Property, ScriptObject};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_type_names() {
        assert_eq!(Dynamic::Undefined.type_name(), "undefined");
        assert_eq!(Dynamic::Int(0).type_name(), "int");
        assert_eq!(Dynamic::Float(0.0).type_name(), "float");
        assert_eq!(Dynamic::Bool(false).type_name(), "boolean");
        assert_eq!(Dynamic::from("x").type_name(), "string");
        assert_eq!(Dynamic::Null.type_name(), "null");
    }

    #[test]
    fn dynamic_nullish() {
        assert!(Dynamic::Undefined.is_nullish());
        assert!(Dynamic::Null.is_nullish());
        assert!(!Dynamic::Int(0).is_nullish());
        assert_eq!(Dynamic::Int(2).as_float(), Some(2.0));
    }

    #[test]
    fn native_fn_call() {
        let native = NativeFn::new(|call: &mut NativeCall<'_>| {
            let a = call.int(0)?;
            let b = call.int(1)?;
            Ok(NativeArg::Int(a + b))
        });

        let mut heap = NativeHeap::new();
        let in_slots = [NativeArg::Int(2), NativeArg::Int(3)];
        let mut out_values: [NativeArg; 0] = [];
        let mut call = NativeCall::new(&in_slots, &[], &mut out_values, 0, &mut heap);

        assert_eq!(native.call(&mut call).unwrap(), NativeArg::Int(5));
    }
}
