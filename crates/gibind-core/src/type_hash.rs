//! Deterministic identity for introspected interface types.
//!
//! Object and boxed wrappers carry the [`TypeHash`] of their native type so
//! converters can check an argument against the interface a parameter
//! expects without comparing strings on every call.

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
pub mod hash_constants {
    /// Domain marker for interface type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for callable hashes
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;
}

/// 64-bit hash of a qualified type name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash a dotted type name.
    ///
    /// ```
    /// use gibind_core::TypeHash;
    ///
    /// assert_eq!(TypeHash::from_name("Gio.File"), TypeHash::from_name("Gio.File"));
    /// assert_ne!(TypeHash::from_name("Gio.File"), TypeHash::from_name("Gio.Icon"));
    /// ```
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash a callable name. Distinct from a type of the same name.
    #[inline]
    pub fn from_function(name: &str) -> Self {
        TypeHash(hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_function_domains_differ() {
        assert_ne!(TypeHash::from_name("Calc.add"), TypeHash::from_function("Calc.add"));
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("GObject.Object").is_empty());
    }
}
