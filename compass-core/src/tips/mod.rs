//! Tip allocation

pub mod queue;

pub use queue::{QueueFull, TipExhausted, TipId, TipQueue, MAX_TIPS};
