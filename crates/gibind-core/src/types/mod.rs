//! Introspection vocabulary: type tags, directions, ownership and flags.

mod direction;
mod flags;
mod type_tag;

pub use direction::{Direction, OwnershipMode};
pub use flags::{FunctionFlags, PropertyFlags};
pub use type_tag::{TypeDescriptor, TypeTag};
