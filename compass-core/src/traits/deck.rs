//! Deck trait
//!
//! Setup entry point of the hardware layer: places labware in slots, loads
//! the pipette and homes the gantry.

use super::labware::{HardwareFault, Labware};
use super::pipette::{Mount, Pipette};

/// Trait for a liquid handler deck
pub trait Deck {
    /// Handle type for plates and tip racks
    type Labware: Labware;
    /// Handle type for the loaded pipette
    type Pipette: Pipette;

    /// Place a plate of type `load_name` in `slot`
    fn load_labware(&mut self, load_name: &str, slot: u8) -> Result<Self::Labware, HardwareFault>;

    /// Place a tip rack of type `load_name` in `slot`
    fn load_tiprack(&mut self, load_name: &str, slot: u8) -> Result<Self::Labware, HardwareFault>;

    /// Load a pipette on `mount`, drawing tips from `tiprack`
    fn load_instrument(
        &mut self,
        model: &str,
        mount: Mount,
        tiprack: &Self::Labware,
    ) -> Result<Self::Pipette, HardwareFault>;

    /// Return the gantry to its rest position
    fn home(&mut self) -> Result<(), HardwareFault>;
}
