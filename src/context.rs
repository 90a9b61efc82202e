//! The bridge context.
//!
//! A `BridgeContext` owns both heaps, the converter registry, the
//! introspection repository and the per-context caches (namespace objects
//! and the function class prototype). Every bridge operation takes it by
//! `&mut`, so a context is used from one thread at a time.
//!
//! # Example
//!
//! ```
//! use gibind::{BridgeContext, call_function};
//! use gibind_core::{CallableDescriptor, Dynamic, NativeArg, NativeCall, OwnershipMode, TypeTag};
//!
//! let mut ctx = BridgeContext::new();
//! ctx.repository_mut()
//!     .register_function(
//!         CallableDescriptor::new("Calc.double", |call: &mut NativeCall<'_>| {
//!             Ok(NativeArg::Int(call.int(0)? * 2))
//!         })
//!         .in_arg("x", TypeTag::Int32)
//!         .returns(TypeTag::Int32, OwnershipMode::None),
//!     )
//!     .unwrap();
//!
//! let double = ctx.resolve("Calc", "double").unwrap().unwrap();
//! let result = call_function(&mut ctx, &double, None, &[Dynamic::Int(21)]).unwrap();
//! assert_eq!(result, Dynamic::Int(42));
//! ```

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use gibind_core::{
    BridgeResult, Dynamic, NativeHeap, ObjectHandle, ObjectHeap, ScriptObject,
};
use gibind_registry::{BaseInfo, ConverterRegistry, MarshalContext, Repository};

use crate::BridgeConfig;
use crate::enumeration::define_enumeration;
use crate::function::define_function;

/// Owner of all bridge state.
pub struct BridgeContext {
    objects: ObjectHeap,
    native: NativeHeap,
    converters: ConverterRegistry,
    repository: Repository,
    config: BridgeConfig,
    global: ObjectHandle,
    /// Namespace path -> namespace object
    namespaces: FxHashMap<String, ObjectHandle>,
    /// Function class prototype, created on first use
    pub(crate) function_class: Option<ObjectHandle>,
}

impl BridgeContext {
    /// Create a context with the default configuration and built-in
    /// converters.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let mut objects = ObjectHeap::with_limits(config.heap_limits());
        let global = objects.allocate_root(ScriptObject::plain());

        Self {
            objects,
            native: NativeHeap::new(),
            converters: ConverterRegistry::with_defaults(),
            repository: Repository::new(),
            config,
            global,
            namespaces: FxHashMap::default(),
            function_class: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The global object namespaces and the function class hang off.
    pub fn global(&self) -> ObjectHandle {
        self.global
    }

    pub fn objects(&self) -> &ObjectHeap {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectHeap {
        &mut self.objects
    }

    pub fn native(&self) -> &NativeHeap {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut NativeHeap {
        &mut self.native
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Replace or add converters.
    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut Repository {
        &mut self.repository
    }

    /// Prototype of the function class, if it has been registered.
    pub fn function_class(&self) -> Option<ObjectHandle> {
        self.function_class
    }

    /// Borrow the heaps and converters for a conversion pass.
    pub fn marshal(&mut self) -> MarshalContext<'_> {
        MarshalContext::new(&mut self.objects, &mut self.native, &self.converters)
    }

    /// Namespace object for a dotted path, created on first request.
    ///
    /// Each segment is defined on its parent (the first on the global object)
    /// with the configured property flags.
    pub fn namespace_object(&mut self, namespace: &str) -> BridgeResult<ObjectHandle> {
        if let Some(&handle) = self.namespaces.get(namespace) {
            return Ok(handle);
        }

        let mut parent = self.global;
        let mut path = String::new();
        for segment in namespace.split('.').filter(|s| !s.is_empty()) {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);

            parent = match self.namespaces.get(&path) {
                Some(&handle) => handle,
                None => {
                    let handle = self.objects.new_plain()?;
                    if let Err(err) = self.define_member(parent, segment, Dynamic::Object(handle)) {
                        self.objects.release(handle);
                        return Err(err);
                    }
                    debug!(namespace = %path, "defined namespace object");
                    self.namespaces.insert(path.clone(), handle);
                    handle
                }
            };
        }

        Ok(parent)
    }

    /// Resolve `namespace.name` through the repository and define it on the
    /// namespace object.
    ///
    /// Returns `Ok(None)` when the repository has no such entry. A name that
    /// is already defined on the namespace object resolves to the value there.
    /// The returned value is owned by the namespace object.
    pub fn resolve(&mut self, namespace: &str, name: &str) -> BridgeResult<Option<Dynamic>> {
        let Some(info) = self.repository.find_by_name(namespace, name).cloned() else {
            trace!(namespace, name, "no introspection entry");
            return Ok(None);
        };

        let ns = self.namespace_object(namespace)?;
        if let Some(existing) = self.objects.get_property(ns, name) {
            trace!(namespace, name, "already defined");
            return Ok(Some(existing.clone()));
        }

        let handle = match info {
            BaseInfo::Function(info) => define_function(self, ns, info)?,
            BaseInfo::Enum(desc) => define_enumeration(self, ns, &desc)?,
        };
        Ok(Some(Dynamic::Object(handle)))
    }

    /// Drop one engine reference.
    ///
    /// When the object dies, objects it holds (array elements and property
    /// values) are released in turn, and a wrapper gives back its native
    /// reference. Returns true when `handle` itself was freed.
    pub fn release_object(&mut self, handle: ObjectHandle) -> bool {
        self.marshal().release_object(handle)
    }

    /// Define `name` on `target` with the configured property flags.
    ///
    /// An object displaced by the definition is released.
    pub(crate) fn define_member(
        &mut self,
        target: ObjectHandle,
        name: &str,
        value: Dynamic,
    ) -> BridgeResult<()> {
        let flags = self.config.property_flags();
        if let Some(Dynamic::Object(displaced)) =
            self.objects.define_property(target, name, value, flags)?
        {
            trace!(name, ?displaced, "released displaced property value");
            self.release_object(displaced);
        }
        Ok(())
    }
}

impl Default for BridgeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeContext")
            .field("objects", &self.objects)
            .field("native", &self.native)
            .field("converters", &self.converters)
            .field("namespaces", &self.namespaces.len())
            .field("function_class", &self.function_class)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibind_core::{HeapLimits, PropertyFlags};

    #[test]
    fn namespace_created_once() {
        let mut ctx = BridgeContext::new();
        let first = ctx.namespace_object("Demo").unwrap();
        let second = ctx.namespace_object("Demo").unwrap();
        assert_eq!(first, second);

        let global = ctx.global();
        assert_eq!(
            ctx.objects().get_property(global, "Demo"),
            Some(&Dynamic::Object(first))
        );
        let prop = ctx.objects().get(global).unwrap().property("Demo").unwrap();
        assert_eq!(prop.flags, PropertyFlags::MODULE);
    }

    #[test]
    fn nested_namespaces() {
        let mut ctx = BridgeContext::new();
        let inner = ctx.namespace_object("Gtk.Widgets").unwrap();
        let outer = ctx.namespace_object("Gtk").unwrap();

        assert_eq!(
            ctx.objects().get_property(outer, "Widgets"),
            Some(&Dynamic::Object(inner))
        );
    }

    #[test]
    fn namespace_limit_surfaces_resource_error() {
        let config = BridgeConfig::new().with_heap_limits(HeapLimits {
            max_objects: 1,
            ..HeapLimits::default()
        });
        let mut ctx = BridgeContext::with_config(config);
        assert!(ctx.namespace_object("Demo").is_err());
        assert!(!ctx.objects().has_property(ctx.global(), "Demo"));
    }

    #[test]
    fn release_cascades_into_arrays_and_wrappers() {
        let mut ctx = BridgeContext::new();
        let ptr = ctx.native_mut().new_instance("Demo.Widget", ());
        let wrapper = ctx
            .objects_mut()
            .allocate(ScriptObject::new(gibind_core::ObjectKind::Instance {
                type_name: "Demo.Widget".into(),
                type_hash: gibind_core::TypeHash::from_name("Demo.Widget"),
                native: ptr,
            }))
            .unwrap();
        ctx.native_mut().add_ref(ptr);
        let array = ctx
            .objects_mut()
            .new_array(vec![Dynamic::Object(wrapper), Dynamic::Int(1)])
            .unwrap();

        assert!(ctx.release_object(array));
        assert!(ctx.objects().get(wrapper).is_none());
        assert_eq!(ctx.native().ref_count(ptr), Some(1));
    }

    #[test]
    fn redefinition_releases_displaced_object() {
        let config = BridgeConfig::new().with_property_flags(PropertyFlags::ENUMERATE);
        let mut ctx = BridgeContext::with_config(config);
        let ptr = ctx.native_mut().new_instance("Demo.Widget", ());
        let ns = ctx.namespace_object("Demo").unwrap();
        let first = ctx
            .objects_mut()
            .allocate(ScriptObject::new(gibind_core::ObjectKind::Instance {
                type_name: "Demo.Widget".into(),
                type_hash: gibind_core::TypeHash::from_name("Demo.Widget"),
                native: ptr,
            }))
            .unwrap();
        ctx.native_mut().add_ref(ptr);
        let second = ctx.objects_mut().new_plain().unwrap();

        ctx.define_member(ns, "current", Dynamic::Object(first)).unwrap();
        ctx.define_member(ns, "current", Dynamic::Object(second)).unwrap();

        assert!(ctx.objects().get(first).is_none());
        assert_eq!(ctx.native().ref_count(ptr), Some(1));
        assert_eq!(
            ctx.objects().get_property(ns, "current"),
            Some(&Dynamic::Object(second))
        );

        ctx.define_member(ns, "current", Dynamic::Object(second)).unwrap();
        assert!(ctx.objects().get(second).is_some());
    }

    #[test]
    fn resolve_unknown_is_none() {
        let mut ctx = BridgeContext::new();
        assert_eq!(ctx.resolve("Demo", "missing").unwrap(), None);
    }
}
