//! Introspected callables.
//!
//! [`CallableInfo`] is the seam between the bridge and the introspection
//! database: everything the invocation engine needs to know about a callable
//! and the trampoline that runs it. [`CallableDescriptor`] is the stock
//! implementation, built by hand or loaded into a repository.

use std::fmt;

use crate::error::{CallableKind, NativeError};
use crate::runtime::{NativeArg, NativeCall, NativeCallable, NativeFn};
use crate::{
    ArgDescriptor, FunctionFlags, OwnershipMode, QualifiedName, TypeDescriptor, TypeHash,
};

/// Read-only view of an introspected callable.
pub trait CallableInfo: fmt::Debug {
    fn name(&self) -> &QualifiedName;

    fn flags(&self) -> FunctionFlags;

    /// Declared parameters, receiver excluded.
    fn args(&self) -> &[ArgDescriptor];

    fn return_type(&self) -> &TypeDescriptor;

    /// Ownership the caller takes of the return value.
    fn caller_owns(&self) -> OwnershipMode;

    /// Run the native implementation against a prepared frame.
    fn invoke(&self, call: &mut NativeCall<'_>) -> Result<NativeArg, NativeError>;

    fn n_args(&self) -> usize {
        self.args().len()
    }

    fn arg(&self, index: usize) -> Option<&ArgDescriptor> {
        self.args().get(index)
    }

    fn is_method(&self) -> bool {
        self.flags().contains(FunctionFlags::IS_METHOD)
    }

    fn kind(&self) -> CallableKind {
        if self.is_method() {
            CallableKind::Method
        } else {
            CallableKind::Function
        }
    }

    fn type_hash(&self) -> TypeHash {
        TypeHash::from_function(&self.name().to_string())
    }
}

/// A callable described by plain data plus a native trampoline.
///
/// ```ignore
/// let add = CallableDescriptor::new("Demo.add", |call: &mut NativeCall<'_>| {
///     let x = call.int(0)?;
///     call.set_out(0, NativeArg::Int(2))?;
///     Ok(NativeArg::Int(x + 2))
/// })
/// .in_arg("x", TypeTag::Int32)
/// .out_arg("carry", TypeTag::Int32, OwnershipMode::None)
/// .returns(TypeTag::Int32, OwnershipMode::None);
/// ```
#[derive(Debug, Clone)]
pub struct CallableDescriptor {
    pub name: QualifiedName,
    pub flags: FunctionFlags,
    pub args: Vec<ArgDescriptor>,
    pub return_type: TypeDescriptor,
    pub caller_owns: OwnershipMode,
    pub native: NativeFn,
}

impl CallableDescriptor {
    /// Create a void function with no parameters.
    pub fn new<F>(name: impl Into<QualifiedName>, native: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            flags: FunctionFlags::empty(),
            args: Vec::new(),
            return_type: TypeDescriptor::void(),
            caller_owns: OwnershipMode::None,
            native: NativeFn::new(native),
        }
    }

    /// Mark as a method taking a receiver.
    pub fn method(mut self) -> Self {
        self.flags |= FunctionFlags::IS_METHOD;
        self
    }

    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_arg(mut self, arg: ArgDescriptor) -> Self {
        self.args.push(arg);
        self
    }

    pub fn in_arg(self, name: impl Into<String>, ty: impl Into<TypeDescriptor>) -> Self {
        self.with_arg(ArgDescriptor::input(name, ty))
    }

    pub fn out_arg(
        self,
        name: impl Into<String>,
        ty: impl Into<TypeDescriptor>,
        transfer: OwnershipMode,
    ) -> Self {
        self.with_arg(ArgDescriptor::output(name, ty, transfer))
    }

    pub fn inout_arg(
        self,
        name: impl Into<String>,
        ty: impl Into<TypeDescriptor>,
        transfer: OwnershipMode,
    ) -> Self {
        self.with_arg(ArgDescriptor::in_out(name, ty, transfer))
    }

    pub fn returns(mut self, ty: impl Into<TypeDescriptor>, transfer: OwnershipMode) -> Self {
        self.return_type = ty.into();
        self.caller_owns = transfer;
        self
    }
}

impl CallableInfo for CallableDescriptor {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn flags(&self) -> FunctionFlags {
        self.flags
    }

    fn args(&self) -> &[ArgDescriptor] {
        &self.args
    }

    fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    fn caller_owns(&self) -> OwnershipMode {
        self.caller_owns
    }

    fn invoke(&self, call: &mut NativeCall<'_>) -> Result<NativeArg, NativeError> {
        self.native.call(call)
    }
}
