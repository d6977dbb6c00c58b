//! Transfer execution
//!
//! Turns a validated transfer plan into hardware actions, one transfer at
//! a time.

pub mod error;
pub mod executor;
pub mod workcell;

pub use error::RunError;
pub use executor::{run_protocol, RunSummary, TransferExecutor};
pub use workcell::Workcell;
