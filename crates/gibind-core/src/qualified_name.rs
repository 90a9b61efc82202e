use std::fmt;

/// Dotted name of an introspected entity (`Gio.File`, `GLib.Variant.new`).
///
/// Error messages and namespace lookups use the qualified form; property
/// definitions on namespace objects use [`simple_name`](Self::simple_name).
///
/// # Examples
///
/// ```
/// use gibind_core::QualifiedName;
///
/// let name = QualifiedName::new("add", vec!["Calc".into()]);
/// assert_eq!(name.to_string(), "Calc.add");
/// assert_eq!(name.namespace_string(), "Calc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Simple name (e.g., "add", "Orientation")
    pub name: String,
    /// Namespace path; empty for entities defined on the global object
    pub namespace: Vec<String>,
}

impl QualifiedName {
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// A name inside a single-segment namespace, the common introspection case.
    pub fn in_namespace(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: vec![namespace.into()],
        }
    }

    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Parse a dotted string. The last segment is the name.
    ///
    /// Empty segments are dropped, so `".Gtk.Button"` equals `"Gtk.Button"`.
    pub fn from_dotted(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split('.')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        match parts.pop() {
            None => Self::global(""),
            Some(name) => Self {
                name,
                namespace: parts,
            },
        }
    }

    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    pub fn simple_name(&self) -> &str {
        &self.name
    }

    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    pub fn namespace_string(&self) -> String {
        self.namespace.join(".")
    }

    /// Compute the [`TypeHash`](crate::TypeHash) of this name.
    pub fn to_type_hash(&self) -> crate::TypeHash {
        crate::TypeHash::from_name(&self.to_string())
    }

    /// `Gtk` + `Button` = `Gtk.Button`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut namespace = self.namespace.clone();
        namespace.push(self.name.clone());
        Self {
            name: name.into(),
            namespace,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (name, namespace) = self.namespace.split_last()?;
        Some(Self {
            name: name.clone(),
            namespace: namespace.to_vec(),
        })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace.join("."), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_dotted(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_dotted(&s)
    }
}
