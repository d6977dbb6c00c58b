//! Hardware implementations for Compass
//!
//! This crate provides concrete implementations of the traits defined
//! in compass-core:
//!
//! - Labware and pipette catalog (well grids, volume limits)
//! - Simulated deck that records every command, with fault injection

#![no_std]
#![deny(unsafe_code)]

pub mod catalog;
pub mod sim;
