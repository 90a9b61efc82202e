//! Introspection entries.
//!
//! - [`CallableDescriptor`] / [`CallableInfo`]: functions and methods
//! - [`EnumDescriptor`]: enumerations and flags
//! - [`ArgDescriptor`], [`EnumValue`]: member types

mod common;
mod enum_entry;
mod function;

pub use common::{ArgDescriptor, EnumValue};
pub use enum_entry::EnumDescriptor;
pub use function::{CallableDescriptor, CallableInfo};
