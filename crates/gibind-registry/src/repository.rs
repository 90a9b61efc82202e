//! Repository - the introspection database.
//!
//! Holds every function and enumeration the bridge can expose, keyed by
//! [`QualifiedName`] and indexed by namespace so a namespace object can
//! resolve its members lazily by simple name.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use gibind_core::{CallableInfo, EnumDescriptor, QualifiedName};

/// One entry of the repository.
#[derive(Debug, Clone)]
pub enum BaseInfo {
    Function(Arc<dyn CallableInfo>),
    Enum(Arc<EnumDescriptor>),
}

impl BaseInfo {
    pub fn name(&self) -> &QualifiedName {
        match self {
            BaseInfo::Function(info) => info.name(),
            BaseInfo::Enum(desc) => &desc.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            BaseInfo::Function(_) => "function",
            BaseInfo::Enum(desc) if desc.is_flags => "flags",
            BaseInfo::Enum(_) => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("'{name}' is already registered as a {existing}")]
    Duplicate {
        name: QualifiedName,
        existing: &'static str,
    },

    #[error("'{name}' must live in a namespace")]
    GlobalName { name: QualifiedName },
}

/// Introspection entries by qualified name.
#[derive(Debug, Default)]
pub struct Repository {
    entries: FxHashMap<QualifiedName, BaseInfo>,
    /// namespace -> simple names, in registration order
    namespaces: FxHashMap<String, Vec<String>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_function<I>(&mut self, info: I) -> Result<(), RepositoryError>
    where
        I: CallableInfo + 'static,
    {
        self.register(BaseInfo::Function(Arc::new(info)))
    }

    pub fn register_enum(&mut self, desc: EnumDescriptor) -> Result<(), RepositoryError> {
        self.register(BaseInfo::Enum(Arc::new(desc)))
    }

    /// Add an entry. Names must be namespaced and unique.
    pub fn register(&mut self, info: BaseInfo) -> Result<(), RepositoryError> {
        let name = info.name().clone();
        if name.is_global() {
            return Err(RepositoryError::GlobalName { name });
        }
        if let Some(existing) = self.entries.get(&name) {
            return Err(RepositoryError::Duplicate {
                name,
                existing: existing.kind_name(),
            });
        }

        self.namespaces
            .entry(name.namespace_string())
            .or_default()
            .push(name.simple_name().to_string());
        self.entries.insert(name, info);
        Ok(())
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&BaseInfo> {
        self.entries.get(name)
    }

    /// Find a member of a namespace by its simple name.
    pub fn find_by_name(&self, namespace: &str, name: &str) -> Option<&BaseInfo> {
        let qualified = QualifiedName::from_dotted(&format!("{namespace}.{name}"));
        self.entries.get(&qualified)
    }

    /// Entries of a namespace in registration order.
    pub fn namespace(&self, namespace: &str) -> impl Iterator<Item = &BaseInfo> {
        self.namespaces
            .get(namespace)
            .into_iter()
            .flatten()
            .filter_map(move |name| self.find_by_name(namespace, name))
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
