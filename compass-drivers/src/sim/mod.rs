//! Simulated liquid handler
//!
//! Used for dry runs and tests. Handles handed out by [`SimDeck`] all record
//! into one borrowed [`CommandLog`], so the full command sequence of a run
//! can be inspected afterwards.

mod deck;
mod log;

pub use deck::{SimDeck, SimLabware, SimPipette, DECK_SLOTS};
pub use log::{Command, CommandKind, CommandLog, FaultPlan, MAX_COMMANDS};
