//! Hardware-agnostic core logic for plate-to-plate transfers
//!
//! This crate contains all sequencing logic that does not depend on a
//! specific liquid handler:
//!
//! - Hardware abstraction traits (deck, labware, pipette)
//! - Well geometry and the compass offset pattern
//! - Tip allocation
//! - Compass mix sequencing
//! - Transfer plan validation
//! - Transfer execution and the run state machine
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod geometry;
pub mod mix;
pub mod state;
pub mod tips;
pub mod traits;
pub mod transfer;
pub mod validate;
