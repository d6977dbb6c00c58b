//! Configuration types
//!
//! Board-agnostic protocol configuration, loaded once before a run.

pub mod types;

pub use types::*;
