//! Configuration type definitions
//!
//! These types describe one protocol run: deck placement, the pipette, the
//! ordered transfer list and the tips to consume. Everything is loaded once
//! before the run and never modified while it executes.

use heapless::{String, Vec};

use crate::geometry::WellLabel;
use crate::mix::MixParameters;
use crate::tips::{TipId, TipQueue, MAX_TIPS};
use crate::traits::Mount;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum labware/instrument type name length
pub const MAX_NAME_LEN: usize = 48;

/// Maximum transfers per protocol
pub const MAX_TRANSFERS: usize = 96;

/// One liquid movement from a source well to a destination well
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransferRequest {
    /// Well on the source plate
    pub source_well: WellLabel,
    /// Well on the destination plate
    pub dest_well: WellLabel,
    /// Volume to move (µL)
    pub volume_ul: f32,
}

impl TransferRequest {
    /// Create a transfer request
    pub const fn new(source_well: WellLabel, dest_well: WellLabel, volume_ul: f32) -> Self {
        Self {
            source_well,
            dest_well,
            volume_ul,
        }
    }
}

/// Labware placement
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabwareConfig {
    /// Labware definition name (e.g. "corning_12_wellplate_6.9ml_flat")
    pub load_name: String<MAX_NAME_LEN>,
    /// Deck slot
    pub slot: u8,
}

impl LabwareConfig {
    /// Create a placement, or `None` if the name does not fit
    pub fn new(load_name: &str, slot: u8) -> Option<Self> {
        Some(Self {
            load_name: String::try_from(load_name).ok()?,
            slot,
        })
    }
}

/// Pipette selection
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipetteConfig {
    /// Instrument model name (e.g. "p1000_single_gen2")
    pub model: String<MAX_NAME_LEN>,
    /// Gantry mount
    pub mount: Mount,
}

impl PipetteConfig {
    /// Create a pipette selection, or `None` if the model name does not fit
    pub fn new(model: &str, mount: Mount) -> Option<Self> {
        Some(Self {
            model: String::try_from(model).ok()?,
            mount,
        })
    }
}

/// Heights used while moving liquid between plates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConfig {
    /// Height above the source rim for approach and the first travel hop (mm)
    pub approach_height_mm: f32,
    /// Height above the destination rim for travel and retreat (mm)
    pub travel_height_mm: f32,
    /// Aspirate height above the source well floor (mm)
    pub aspirate_depth_mm: f32,
    /// Dispense height above the destination well floor (mm)
    pub dispense_depth_mm: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            approach_height_mm: 2.0,
            travel_height_mm: 40.0,
            aspirate_depth_mm: 0.0,
            dispense_depth_mm: 0.0,
        }
    }
}

/// Complete protocol configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolConfig {
    /// Plate liquid is drawn from
    pub source: LabwareConfig,
    /// Plate liquid is delivered to
    pub destination: LabwareConfig,
    /// Tip rack
    pub tiprack: LabwareConfig,
    /// Pipette
    pub pipette: PipetteConfig,
    /// Transfers in execution order
    pub transfers: Vec<TransferRequest, MAX_TRANSFERS>,
    /// Compass mix applied at every source well
    pub mix: MixParameters,
    /// Travel and liquid handling heights
    pub motion: MotionConfig,
    /// Tips in consumption order
    pub tips: Vec<TipId, MAX_TIPS>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            source: LabwareConfig {
                load_name: name("corning_12_wellplate_6.9ml_flat"),
                slot: 1,
            },
            destination: LabwareConfig {
                load_name: name("corning_12_wellplate_6.9ml_flat"),
                slot: 2,
            },
            tiprack: LabwareConfig {
                load_name: name("opentrons_96_filtertiprack_1000ul"),
                slot: 4,
            },
            pipette: PipetteConfig {
                model: name("p1000_single_gen2"),
                mount: Mount::Left,
            },
            transfers: Vec::new(),
            mix: MixParameters::default(),
            motion: MotionConfig::default(),
            tips: Vec::new(),
        }
    }
}

impl ProtocolConfig {
    /// Create a configuration with default placement and no transfers
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh queue holding the configured tips in order
    pub fn tip_queue(&self) -> TipQueue {
        let mut queue = TipQueue::new();
        for tip in &self.tips {
            // Both collections share MAX_TIPS, so this cannot overflow
            let _ = queue.push(*tip);
        }
        queue
    }
}

fn name(s: &str) -> String<MAX_NAME_LEN> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(s: &str) -> WellLabel {
        WellLabel::parse(s).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ProtocolConfig::new();
        assert_eq!(config.source.slot, 1);
        assert_eq!(config.destination.slot, 2);
        assert_eq!(config.tiprack.slot, 4);
        assert_eq!(config.pipette.model.as_str(), "p1000_single_gen2");
        assert!(config.transfers.is_empty());
        assert!(config.tip_queue().is_empty());
    }

    #[test]
    fn test_tip_queue_preserves_order() {
        let mut config = ProtocolConfig::new();
        let _ = config.tips.push(TipId(well("B1")));
        let _ = config.tips.push(TipId(well("A1")));

        let mut queue = config.tip_queue();
        assert_eq!(queue.next_tip(), Ok(TipId(well("B1"))));
        assert_eq!(queue.next_tip(), Ok(TipId(well("A1"))));
    }

    #[test]
    fn test_labware_name_too_long() {
        let long = "corning_12_wellplate_6.9ml_flat_with_extra_suffix";
        assert!(long.len() > MAX_NAME_LEN);
        assert!(LabwareConfig::new(long, 1).is_none());
        assert!(LabwareConfig::new("nest_96_wellplate_200ul_flat", 3).is_some());
    }

    #[test]
    fn test_motion_defaults() {
        let motion = MotionConfig::default();
        assert_eq!(motion.approach_height_mm, 2.0);
        assert_eq!(motion.travel_height_mm, 40.0);
    }
}
