//! Compass-pattern mixing
//!
//! Converts mix parameters into the ordered steps executed at a source
//! well before it is aspirated.

pub mod sequence;

pub use sequence::{mix_sequence, MixParameters, MixStep, MIX_STEPS};
