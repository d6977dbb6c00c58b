//! State machine for protocol runs
//!
//! The run state is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::RunEvent;
pub use machine::{AbortKind, RunState};
