//! Error types for the Carryover protocol layer.

mod context;
mod store;

pub use context::*;
pub use store::*;
