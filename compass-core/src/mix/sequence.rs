//! Compass mix sequence
//!
//! A compass mix runs the pipette's mix cycle at the five compass points of
//! a well and then returns the plate frame to zero. The reset is an
//! ordinary step so callers can run it on its own after a failed point.

use crate::geometry::{compass_offsets, CompassPoint, Offset, WellLabel, COMPASS_POINTS};
use crate::traits::{HardwareFault, Labware, Pipette};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Steps per compass mix (five points plus the frame reset)
pub const MIX_STEPS: usize = COMPASS_POINTS + 1;

/// Mixing parameters shared by every transfer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixParameters {
    /// Volume drawn and expelled per cycle (µL)
    pub volume_ul: f32,
    /// Aspirate/dispense cycles at each point
    pub repetitions_per_point: u8,
    /// Distance of the radial points from the well center (mm)
    pub radius_mm: f32,
    /// Mixing height above the well floor (mm)
    pub depth_from_bottom_mm: f32,
    /// Flow rate multiplier (1.0 = pipette default)
    pub rate: f32,
}

impl Default for MixParameters {
    fn default() -> Self {
        Self {
            volume_ul: 1000.0,
            repetitions_per_point: 3,
            radius_mm: 7.5,
            depth_from_bottom_mm: 2.5,
            rate: 5.5,
        }
    }
}

/// One step of a compass mix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixStep {
    /// Shift the frame to `offset` and mix at `well`
    Mix {
        well: WellLabel,
        point: CompassPoint,
        offset: Offset,
    },
    /// Return the frame to zero
    ResetOffset,
}

impl MixStep {
    /// Execute this step against the plate holding the well
    pub fn run<L, P>(
        &self,
        plate: &mut L,
        pipette: &mut P,
        params: &MixParameters,
    ) -> Result<(), HardwareFault>
    where
        L: Labware + ?Sized,
        P: Pipette + ?Sized,
    {
        match *self {
            MixStep::Mix { well, offset, .. } => {
                plate.set_offset(offset)?;
                let target = plate.bottom(well, params.depth_from_bottom_mm)?;
                pipette.mix(
                    params.repetitions_per_point,
                    params.volume_ul,
                    &target,
                    params.rate,
                )
            }
            MixStep::ResetOffset => plate.set_offset(Offset::ZERO),
        }
    }

    /// Compass point mixed by this step, if any
    pub fn point(&self) -> Option<CompassPoint> {
        match self {
            MixStep::Mix { point, .. } => Some(*point),
            MixStep::ResetOffset => None,
        }
    }

    /// Check whether this is the frame reset
    pub fn is_reset(&self) -> bool {
        matches!(self, MixStep::ResetOffset)
    }
}

/// Build the compass mix for `well`
///
/// Order is center, north, south, east, west, reset.
pub fn mix_sequence(well: WellLabel, params: &MixParameters) -> [MixStep; MIX_STEPS] {
    let offsets = compass_offsets(params.radius_mm);
    let mut steps = [MixStep::ResetOffset; MIX_STEPS];

    for (i, point) in CompassPoint::ALL.iter().enumerate() {
        steps[i] = MixStep::Mix {
            well,
            point: *point,
            offset: offsets[i],
        };
    }

    steps
}
