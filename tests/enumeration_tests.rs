//! Integration tests for enumeration objects.

use gibind::prelude::*;
use gibind_core::HeapLimits;

fn color() -> EnumDescriptor {
    EnumDescriptor::new("Demo.Color")
        .with_value("RED", 0)
        .with_value("GREEN", 1)
        .with_value("BLUE", 2)
}

#[test]
fn test_enum_values_are_defined() {
    let mut ctx = BridgeContext::new();
    let obj = lookup_enumeration(&mut ctx, &color()).unwrap();

    for (name, value) in [("RED", 0), ("GREEN", 1), ("BLUE", 2)] {
        assert_eq!(
            ctx.objects().get_property(obj, name),
            Some(&Dynamic::Int(value))
        );
    }

    let prop = ctx.objects().get(obj).unwrap().property("RED").unwrap();
    assert_eq!(prop.flags, PropertyFlags::PERMANENT | PropertyFlags::ENUMERATE);
}

#[test]
fn test_define_is_idempotent() {
    let mut ctx = BridgeContext::new();
    let first = lookup_enumeration(&mut ctx, &color()).unwrap();
    let live = ctx.objects().live_count();

    let second = lookup_enumeration(&mut ctx, &color()).unwrap();
    assert_eq!(first, second);
    assert_eq!(ctx.objects().live_count(), live);
}

#[test]
fn test_existing_non_object_collides() {
    let mut ctx = BridgeContext::new();
    let ns = ctx.namespace_object("Demo").unwrap();
    ctx.objects_mut()
        .define_property(ns, "Color", Dynamic::from("taken"), PropertyFlags::empty())
        .unwrap();

    let err = define_enumeration(&mut ctx, ns, &color()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "existing property 'Color' does not look like an enum object, found string"
    );
}

#[test]
fn test_failed_value_leaves_namespace_untouched() {
    let config = BridgeConfig::new().with_heap_limits(HeapLimits {
        max_properties: 2,
        ..HeapLimits::default()
    });
    let mut ctx = BridgeContext::with_config(config);
    let ns = ctx.namespace_object("Demo").unwrap();
    let live = ctx.objects().live_count();

    let err = define_enumeration(&mut ctx, ns, &color()).unwrap_err();

    assert_eq!(
        err,
        BridgeError::ResourceDefinition {
            property: "BLUE".to_string(),
            reason: "property limit reached".to_string(),
        }
    );
    assert!(!ctx.objects().has_property(ns, "Color"));
    assert_eq!(ctx.objects().live_count(), live);
}

#[test]
fn test_empty_enumeration() {
    let mut ctx = BridgeContext::new();
    let obj = lookup_enumeration(&mut ctx, &EnumDescriptor::new("Demo.Nothing")).unwrap();
    assert_eq!(ctx.objects().get(obj).unwrap().property_count(), 0);
}

#[test]
fn test_custom_property_flags() {
    let config = BridgeConfig::new().with_property_flags(PropertyFlags::READ_ONLY);
    let mut ctx = BridgeContext::with_config(config);
    let obj = lookup_enumeration(&mut ctx, &color()).unwrap();

    let prop = ctx.objects().get(obj).unwrap().property("BLUE").unwrap();
    assert_eq!(prop.flags, PropertyFlags::READ_ONLY);
}
