//! Argument marshaling and invocation.
//!
//! ```text
//! script call
//!   -> Signature::analyze   classify parameters, count slots
//!   -> NativeFrame::build   convert inputs, reserve output cells
//!   -> CallableInfo::invoke run native code
//!   -> lift_results         convert return value and outputs, release
//!   -> value or BridgeError
//! ```

mod engine;
mod frame;
mod lift;
mod signature;

pub use engine::invoke;
pub use frame::NativeFrame;
pub use lift::{lift_results, package};
pub use signature::Signature;
