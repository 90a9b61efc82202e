//! Function objects.
//!
//! A function object is an engine object of kind `Function` bound to a
//! shared callable descriptor, with the function class prototype as its
//! prototype. Calling it runs the invocation engine.

use std::sync::Arc;

use tracing::debug;

use gibind_core::{
    BridgeError, BridgeResult, CallableInfo, Dynamic, ObjectHandle, ObjectKind, ScriptObject,
};

use crate::BridgeContext;
use crate::class::ensure_function_class;
use crate::invoke::invoke;

/// Create a function object for `info` without defining it anywhere.
pub fn new_function(
    ctx: &mut BridgeContext,
    info: Arc<dyn CallableInfo>,
) -> BridgeResult<ObjectHandle> {
    let prototype = ensure_function_class(ctx)?;
    ctx.objects_mut()
        .allocate(ScriptObject::new(ObjectKind::Function(Some(info))).with_prototype(prototype))
}

/// Create a function object for `info` and define it on `namespace` under
/// the callable's simple name.
pub fn define_function(
    ctx: &mut BridgeContext,
    namespace: ObjectHandle,
    info: Arc<dyn CallableInfo>,
) -> BridgeResult<ObjectHandle> {
    let name = info.name().simple_name().to_string();
    let function = new_function(ctx, info)?;

    if let Err(err) = ctx.define_member(namespace, &name, Dynamic::Object(function)) {
        debug!(function = %name, error = %err, "failed to define function");
        ctx.release_object(function);
        return Err(err);
    }

    Ok(function)
}

/// Call a script value as a function.
///
/// Bound function objects run their callable. The function class prototype
/// is callable too and returns `undefined`. Anything else is not callable.
pub fn call_function(
    ctx: &mut BridgeContext,
    callee: &Dynamic,
    this: Option<&Dynamic>,
    args: &[Dynamic],
) -> BridgeResult<Dynamic> {
    let Dynamic::Object(handle) = callee else {
        return Err(BridgeError::NotCallable {
            found: callee.type_name(),
        });
    };

    let object = ctx.objects().try_get(*handle)?;
    let info = match object.kind() {
        ObjectKind::Function(Some(info)) => Arc::clone(info),
        ObjectKind::Function(None) => return Ok(Dynamic::Undefined),
        other => return Err(BridgeError::NotCallable { found: other.name() }),
    };

    debug!(callee = ?handle, this = ?this, callable = %info.name(), "call function");
    invoke(ctx, info.as_ref(), this, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibind_core::{CallableDescriptor, NativeArg, NativeCall, NativeError};

    fn noop(_: &mut NativeCall<'_>) -> Result<NativeArg, NativeError> {
        Ok(NativeArg::Void)
    }

    #[test]
    fn function_object_shares_descriptor() {
        let mut ctx = BridgeContext::new();
        let info: Arc<dyn CallableInfo> = Arc::new(CallableDescriptor::new("Demo.noop", noop));
        let ns = ctx.namespace_object("Demo").unwrap();

        let function = define_function(&mut ctx, ns, Arc::clone(&info)).unwrap();
        assert_eq!(Arc::strong_count(&info), 2);
        assert_eq!(
            ctx.objects().get(function).unwrap().prototype(),
            ctx.function_class()
        );
    }

    #[test]
    fn non_objects_are_not_callable() {
        let mut ctx = BridgeContext::new();
        let err = call_function(&mut ctx, &Dynamic::Int(1), None, &[]).unwrap_err();
        assert_eq!(err, BridgeError::NotCallable { found: "int" });

        let plain = ctx.objects_mut().new_plain().unwrap();
        let err = call_function(&mut ctx, &Dynamic::Object(plain), None, &[]).unwrap_err();
        assert_eq!(err, BridgeError::NotCallable { found: "object" });
    }

    #[test]
    fn define_failure_releases_function_object() {
        let mut ctx = BridgeContext::new();
        let ns = ctx.namespace_object("Demo").unwrap();
        let first: Arc<dyn CallableInfo> = Arc::new(CallableDescriptor::new("Demo.f", noop));
        let second: Arc<dyn CallableInfo> = Arc::new(CallableDescriptor::new("Demo.f", noop));

        define_function(&mut ctx, ns, first).unwrap();
        let live = ctx.objects().live_count();

        // A different object under a permanent name is rejected.
        assert!(define_function(&mut ctx, ns, Arc::clone(&second)).is_err());
        assert_eq!(ctx.objects().live_count(), live);
        assert_eq!(Arc::strong_count(&second), 1);
    }
}
