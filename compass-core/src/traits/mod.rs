//! Hardware abstraction traits
//!
//! These traits define the interface between the sequencing logic and the
//! liquid handler. Geometry, calibration and actuation live behind them.

pub mod deck;
pub mod labware;
pub mod pipette;

pub use deck::Deck;
pub use labware::{Anchor, HardwareFault, Labware, Location};
pub use pipette::{Mount, Pipette};
