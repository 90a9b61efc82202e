//! The function class.
//!
//! Every function object shares one prototype, registered on the global
//! object the first time a function is defined in a context. The prototype
//! itself is callable and does nothing.

use tracing::debug;

use gibind_core::{BridgeResult, Dynamic, ObjectHandle, ObjectKind, ScriptObject};

use crate::BridgeContext;

/// Prototype of the function class, registering it on first use.
pub fn ensure_function_class(ctx: &mut BridgeContext) -> BridgeResult<ObjectHandle> {
    if let Some(prototype) = ctx.function_class
        && ctx.objects().get(prototype).is_some()
    {
        return Ok(prototype);
    }

    let prototype = ctx
        .objects_mut()
        .allocate(ScriptObject::new(ObjectKind::Function(None)))?;

    let global = ctx.global();
    let name = ctx.config().function_class_name().to_string();
    if let Err(err) = ctx.define_member(global, &name, Dynamic::Object(prototype)) {
        ctx.release_object(prototype);
        return Err(err);
    }

    debug!(class = %name, ?prototype, "initialized function class");
    ctx.function_class = Some(prototype);
    Ok(prototype)
}

/// True for the function class prototype.
pub fn is_function_prototype(ctx: &BridgeContext, handle: ObjectHandle) -> bool {
    ctx.function_class == Some(handle)
}
