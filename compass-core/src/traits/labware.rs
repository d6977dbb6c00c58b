//! Labware trait
//!
//! Plates and tip racks resolve well labels into absolute motion targets.
//! Each labware item owns a spatial frame offset which is applied to every
//! target it resolves until the offset is changed again.

use core::fmt;

use crate::geometry::{Offset, PlateGrid, WellLabel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Failure reported by the hardware layer
///
/// Faults are never retried: liquid handling actions cannot be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareFault {
    /// Labware or instrument type is not known to the deck
    UnknownDefinition,
    /// Deck slot does not exist
    InvalidSlot,
    /// Deck slot already holds labware
    SlotOccupied,
    /// Well is not part of the labware
    WellNotFound,
    /// Tip could not be picked up (missing or already used)
    TipPickupFailed,
    /// Operation needs a tip but none is attached
    NoTipAttached,
    /// A tip is already attached
    TipAlreadyAttached,
    /// Requested volume exceeds what the pipette can hold
    VolumeExceeded,
    /// Motion did not complete
    MotionFailed,
    /// Communication with the instrument failed
    Communication,
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HardwareFault::UnknownDefinition => "unknown labware or instrument definition",
            HardwareFault::InvalidSlot => "invalid deck slot",
            HardwareFault::SlotOccupied => "deck slot already occupied",
            HardwareFault::WellNotFound => "well not found on labware",
            HardwareFault::TipPickupFailed => "tip pickup failed",
            HardwareFault::NoTipAttached => "no tip attached",
            HardwareFault::TipAlreadyAttached => "tip already attached",
            HardwareFault::VolumeExceeded => "volume exceeds pipette capacity",
            HardwareFault::MotionFailed => "motion failed",
            HardwareFault::Communication => "instrument communication failed",
        };
        f.write_str(msg)
    }
}

/// Vertical reference of a well target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Anchor {
    /// Height measured up from the well rim
    Top,
    /// Height measured up from the well floor
    Bottom,
}

/// Absolute motion target inside or above a well
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Deck slot of the labware
    pub slot: u8,
    /// Target well
    pub well: WellLabel,
    /// Vertical reference
    pub anchor: Anchor,
    /// Height above the anchor (mm)
    pub height_mm: f32,
    /// Frame offset in effect when the target was resolved
    pub offset: Offset,
}

/// Trait for plates and tip racks placed on the deck
///
/// Implementations only provide placement and frame state; target
/// resolution is shared.
pub trait Labware {
    /// Deck slot this labware occupies
    fn slot(&self) -> u8;

    /// Well grid of the labware definition
    fn grid(&self) -> PlateGrid;

    /// Current frame offset
    fn offset(&self) -> Offset;

    /// Shift the labware frame
    ///
    /// The offset persists for every subsequently resolved target until it
    /// is set again.
    fn set_offset(&mut self, offset: Offset) -> Result<(), HardwareFault>;

    /// Target `height_mm` above the rim of `well`
    fn top(&self, well: WellLabel, height_mm: f32) -> Result<Location, HardwareFault> {
        self.resolve(well, Anchor::Top, height_mm)
    }

    /// Target `height_mm` above the floor of `well`
    fn bottom(&self, well: WellLabel, height_mm: f32) -> Result<Location, HardwareFault> {
        self.resolve(well, Anchor::Bottom, height_mm)
    }

    /// Resolve a well and vertical reference into a target
    fn resolve(
        &self,
        well: WellLabel,
        anchor: Anchor,
        height_mm: f32,
    ) -> Result<Location, HardwareFault> {
        if !self.grid().contains(well) {
            return Err(HardwareFault::WellNotFound);
        }

        Ok(Location {
            slot: self.slot(),
            well,
            anchor,
            height_mm,
            offset: self.offset(),
        })
    }
}
