//! Error types for the binding core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! BridgeError (what a script caller sees)
//! ├── Arity              - too few arguments, raised before any conversion
//! ├── Conversion         - ConversionError from a type converter, unchanged
//! ├── Invocation         - the native call reported a NativeError
//! ├── ResourceDefinition - the engine refused to define a property/object
//! ├── NamingCollision    - an existing property has an incompatible shape
//! ├── InvalidThis        - method receiver is not a native wrapper
//! ├── NotCallable        - callee is not a function object
//! └── StaleObject        - engine object handle no longer valid
//! ```

use std::fmt;

use thiserror::Error;

use crate::{QualifiedName, TypeTag};

/// Errors raised while converting between script values and native slots.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A null pointer where the native type does not allow one
    #[error("null pointer cannot be converted to {target}")]
    NullPointer { target: &'static str },

    #[error("integer overflow: value {value} does not fit in {target}")]
    IntegerOverflow { value: i128, target: &'static str },

    #[error("float conversion error: value {value} cannot be represented as {target}")]
    FloatConversion { value: f64, target: &'static str },

    /// Native pointer does not refer to live native memory
    #[error("dangling native pointer {pointer} for {target}")]
    DanglingPointer { pointer: u32, target: &'static str },

    /// Script object handle was freed
    #[error("stale object handle at index {index}")]
    StaleHandle { index: u32 },

    /// Wrapper wraps a different native type than the parameter expects
    #[error("object of type {actual} cannot be used as {expected}")]
    WrongInterface {
        expected: QualifiedName,
        actual: QualifiedName,
    },

    #[error("no converter registered for type tag {tag}")]
    Unsupported { tag: TypeTag },

    #[error("container type {tag} has no element type")]
    MissingElementType { tag: TypeTag },

    #[error("conversion failed: {message}")]
    Failed { message: String },
}

impl ConversionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ConversionError::Failed {
            message: message.into(),
        }
    }
}

/// Failure reported by a native callable, the analogue of a `GError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NativeError {
    pub domain: String,
    pub code: i32,
    pub message: String,
}

impl NativeError {
    pub fn new(domain: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            code,
            message: message.into(),
        }
    }

    /// An error in the generic `gibind` domain with code 0.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new("gibind", 0, message)
    }
}

/// Whether a callable is a free function or a method with a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function,
    Method,
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallableKind::Function => f.write_str("function"),
            CallableKind::Method => f.write_str("method"),
        }
    }
}

/// Script-visible exception produced by the binding core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("too few arguments to {kind} {callable}: expected {expected}, got {actual}")]
    Arity {
        kind: CallableKind,
        callable: QualifiedName,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("error invoking {callable}: {source}")]
    Invocation {
        callable: QualifiedName,
        source: NativeError,
    },

    #[error("unable to define property '{property}': {reason}")]
    ResourceDefinition { property: String, reason: String },

    #[error("existing property '{name}' does not look like {expected}, found {found}")]
    NamingCollision {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid 'this' for {callable}: {message}")]
    InvalidThis {
        callable: QualifiedName,
        message: String,
    },

    #[error("value of type {found} is not callable")]
    NotCallable { found: &'static str },

    #[error("stale object handle at index {index}")]
    StaleObject { index: u32 },
}

impl BridgeError {
    pub fn resource(property: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::ResourceDefinition {
            property: property.into(),
            reason: reason.into(),
        }
    }

    /// True when the error came out of a type converter.
    pub fn is_conversion(&self) -> bool {
        matches!(self, BridgeError::Conversion(_))
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_message_names_callable() {
        let err = BridgeError::Arity {
            kind: CallableKind::Method,
            callable: QualifiedName::in_namespace("Gio", "read"),
            expected: 2,
            actual: 1,
        };
        let text = err.to_string();
        assert!(text.contains("too few arguments to method Gio.read"));
        assert!(text.contains("expected 2, got 1"));
    }

    #[test]
    fn invocation_message_includes_native_message() {
        let err = BridgeError::Invocation {
            callable: QualifiedName::in_namespace("Gio", "open"),
            source: NativeError::new("g-io-error-quark", 1, "No such file"),
        };
        assert_eq!(err.to_string(), "error invoking Gio.open: No such file");
    }

    #[test]
    fn conversion_is_transparent() {
        let err: BridgeError = ConversionError::TypeMismatch {
            expected: "int",
            actual: "string",
        }
        .into();
        assert!(err.is_conversion());
        assert_eq!(err.to_string(), "type mismatch: expected int, got string");
    }

    #[test]
    fn integer_overflow_mentions_target() {
        let err = ConversionError::IntegerOverflow {
            value: 300,
            target: "guint8",
        };
        assert!(err.to_string().contains("300"));
        assert!(err.to_string().contains("guint8"));
    }

    #[test]
    fn naming_collision_message() {
        let err = BridgeError::NamingCollision {
            name: "Color".into(),
            expected: "an enum object",
            found: "int",
        };
        assert!(err.to_string().contains("'Color'"));
    }
}
