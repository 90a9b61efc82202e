//! Type conversion and introspection lookup for gibind.
//!
//! - [`TypeConverter`] / [`MarshalContext`]: the conversion capability
//! - [`ConverterRegistry`]: tag-keyed converter dispatch
//! - [`convert`]: built-in converters
//! - [`Repository`]: functions and enumerations by qualified name

pub mod convert;
mod converter;
mod registry;
mod repository;

pub use converter::{MarshalContext, TypeConverter};
pub use registry::ConverterRegistry;
pub use repository::{BaseInfo, Repository, RepositoryError};
