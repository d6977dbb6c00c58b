//! Pipette trait
//!
//! Every operation blocks until the physical action has completed.

use super::labware::{HardwareFault, Location};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pipette mount on the gantry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mount {
    #[default]
    Left,
    Right,
}

/// Trait for single-channel pipettes
pub trait Pipette {
    /// Pick up the tip at `tip`
    fn pick_up_tip(&mut self, tip: &Location) -> Result<(), HardwareFault>;

    /// Eject the attached tip into the trash
    ///
    /// Tips are single-use and never returned to the rack.
    fn drop_tip(&mut self) -> Result<(), HardwareFault>;

    /// Check whether a tip is attached
    fn has_tip(&self) -> bool;

    /// Aspirate and dispense `volume_ul` at `location`, `repetitions` times
    ///
    /// `rate` scales the default flow rate (1.0 = default).
    fn mix(
        &mut self,
        repetitions: u8,
        volume_ul: f32,
        location: &Location,
        rate: f32,
    ) -> Result<(), HardwareFault>;

    /// Draw `volume_ul` into the tip at `location`
    fn aspirate(&mut self, volume_ul: f32, location: &Location) -> Result<(), HardwareFault>;

    /// Expel `volume_ul` from the tip at `location`
    fn dispense(&mut self, volume_ul: f32, location: &Location) -> Result<(), HardwareFault>;

    /// Move the tip end to `location`
    fn move_to(&mut self, location: &Location) -> Result<(), HardwareFault>;
}
