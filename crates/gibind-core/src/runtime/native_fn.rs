//! Native function storage and callable trait.

use std::fmt;
use std::sync::Arc;

use super::{NativeArg, NativeCall};
use crate::error::NativeError;

/// Type-erased native function, the call trampoline of a descriptor.
///
/// The callable is shared through `Arc`, so cloning a descriptor never
/// duplicates the implementation.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Run the native function. `Ok` carries the return slot.
    pub fn call(&self, call: &mut NativeCall<'_>) -> Result<NativeArg, NativeError> {
        self.inner.call(call)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

/// Trait for callable native functions.
pub trait NativeCallable {
    fn call(&self, call: &mut NativeCall<'_>) -> Result<NativeArg, NativeError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut NativeCall<'_>) -> Result<NativeArg, NativeError>,
{
    fn call(&self, call: &mut NativeCall<'_>) -> Result<NativeArg, NativeError> {
        (self)(call)
    }
}
