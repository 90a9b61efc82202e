//! Enumeration objects.

use tracing::debug;

use gibind_core::{BridgeError, BridgeResult, Dynamic, EnumDescriptor, ObjectHandle};

use crate::BridgeContext;

/// Define the enumeration `desc` on `namespace`.
///
/// If the namespace already holds an object under the enum's name, that
/// object is returned unchanged. A non-object value there is a naming
/// collision. Otherwise a fresh object gets one property per value and is
/// then attached to the namespace; if any definition fails, the namespace
/// is left as it was.
pub fn define_enumeration(
    ctx: &mut BridgeContext,
    namespace: ObjectHandle,
    desc: &EnumDescriptor,
) -> BridgeResult<ObjectHandle> {
    let name = desc.simple_name();

    match ctx.objects().get_property(namespace, name) {
        Some(Dynamic::Object(existing)) => return Ok(*existing),
        Some(other) => {
            return Err(BridgeError::NamingCollision {
                name: name.to_string(),
                expected: "an enum object",
                found: other.type_name(),
            });
        }
        None => {}
    }

    let enum_obj = ctx.objects_mut().new_plain()?;

    for value in &desc.values {
        debug!(
            "defining {}.{} value {}",
            desc.name,
            value.name,
            value.value
        );
        if let Err(err) = ctx.define_member(enum_obj, &value.name, Dynamic::Int(value.value)) {
            ctx.release_object(enum_obj);
            return Err(err);
        }
    }

    debug!(
        "defining {} in namespace {}, value {:?}",
        name,
        desc.name.namespace_string(),
        enum_obj
    );
    if let Err(err) = ctx.define_member(namespace, name, Dynamic::Object(enum_obj)) {
        ctx.release_object(enum_obj);
        return Err(err);
    }

    Ok(enum_obj)
}

/// Define `desc` on the namespace object named by its qualified name.
pub fn lookup_enumeration(
    ctx: &mut BridgeContext,
    desc: &EnumDescriptor,
) -> BridgeResult<ObjectHandle> {
    let namespace = ctx.namespace_object(&desc.name.namespace_string())?;
    define_enumeration(ctx, namespace, desc)
}
