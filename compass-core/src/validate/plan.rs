//! Transfer plan validation
//!
//! Runs once before any motion. Any failure rejects the whole run, so a
//! bad plan never leaves a plate half processed.

use core::fmt;

use crate::config::{ProtocolConfig, TransferRequest, MAX_TRANSFERS};
use crate::geometry::{PlateGrid, WellLabel};
use crate::mix::MixParameters;
use crate::tips::{TipId, TipQueue};

/// Mix parameter that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixField {
    Volume,
    Repetitions,
    Radius,
    Depth,
    Rate,
}

/// Reasons a plan is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Mix parameter out of range
    InvalidMixParameter(MixField),
    /// More transfers than a protocol can hold
    TooManyTransfers { count: u16 },
    /// Transfer volume is zero, negative or not finite
    InvalidVolume { index: u8 },
    /// Source well is not on the source plate
    SourceWellOutOfRange { index: u8, well: WellLabel },
    /// Destination well is not on the destination plate
    DestWellOutOfRange { index: u8, well: WellLabel },
    /// Tip position is not on the tip rack
    TipOutOfRange { position: u8, tip: TipId },
    /// Tip appears more than once in the queue
    DuplicateTip { position: u8, tip: TipId },
    /// Fewer tips than transfers
    InsufficientTips { required: u16, available: u16 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidMixParameter(field) => {
                write!(f, "invalid mix parameter: {:?}", field)
            }
            ValidationError::TooManyTransfers { count } => {
                write!(f, "{} transfers exceed the limit of {}", count, MAX_TRANSFERS)
            }
            ValidationError::InvalidVolume { index } => {
                write!(f, "transfer {} has a non-positive volume", index)
            }
            ValidationError::SourceWellOutOfRange { index, well } => {
                write!(f, "transfer {}: source well {} is not on the source plate", index, well)
            }
            ValidationError::DestWellOutOfRange { index, well } => {
                write!(
                    f,
                    "transfer {}: destination well {} is not on the destination plate",
                    index, well
                )
            }
            ValidationError::TipOutOfRange { position, tip } => {
                write!(f, "tip {} ({}) is not on the tip rack", position, tip)
            }
            ValidationError::DuplicateTip { position, tip } => {
                write!(f, "tip {} ({}) is listed more than once", position, tip)
            }
            ValidationError::InsufficientTips {
                required,
                available,
            } => {
                write!(f, "need {} tips, only {} listed", required, available)
            }
        }
    }
}

/// Well grids of the three labware items a plan refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlanGrids {
    /// Source plate
    pub source: PlateGrid,
    /// Destination plate
    pub destination: PlateGrid,
    /// Tip rack
    pub tiprack: PlateGrid,
}

/// Validate a transfer plan
///
/// Checks, in order: mix parameters, each transfer (volume, then wells),
/// tip positions and uniqueness, then tip count. The first failure is
/// returned. The check is pure and may be repeated freely.
pub fn validate(
    transfers: &[TransferRequest],
    tips: &TipQueue,
    mix: &MixParameters,
    grids: &PlanGrids,
) -> Result<(), ValidationError> {
    validate_mix(mix)?;

    if transfers.len() > MAX_TRANSFERS {
        return Err(ValidationError::TooManyTransfers {
            count: transfers.len().min(u16::MAX as usize) as u16,
        });
    }

    for (i, transfer) in transfers.iter().enumerate() {
        let index = i as u8;

        if !is_positive(transfer.volume_ul) {
            return Err(ValidationError::InvalidVolume { index });
        }
        if !grids.source.contains(transfer.source_well) {
            return Err(ValidationError::SourceWellOutOfRange {
                index,
                well: transfer.source_well,
            });
        }
        if !grids.destination.contains(transfer.dest_well) {
            return Err(ValidationError::DestWellOutOfRange {
                index,
                well: transfer.dest_well,
            });
        }
    }

    for (i, tip) in tips.iter().enumerate() {
        let position = i as u8;

        if !grids.tiprack.contains(tip.well()) {
            return Err(ValidationError::TipOutOfRange {
                position,
                tip: *tip,
            });
        }
        if tips.iter().take(i).any(|earlier| earlier == tip) {
            return Err(ValidationError::DuplicateTip {
                position,
                tip: *tip,
            });
        }
    }

    if tips.remaining() < transfers.len() {
        return Err(ValidationError::InsufficientTips {
            required: transfers.len() as u16,
            available: tips.remaining() as u16,
        });
    }

    Ok(())
}

/// Validate a complete protocol configuration
pub fn validate_config(config: &ProtocolConfig, grids: &PlanGrids) -> Result<(), ValidationError> {
    validate(&config.transfers, &config.tip_queue(), &config.mix, grids)
}

/// Validate mix parameters on their own
pub fn validate_mix(mix: &MixParameters) -> Result<(), ValidationError> {
    let invalid = |field| -> Result<(), ValidationError> {
        Err(ValidationError::InvalidMixParameter(field))
    };

    if !is_positive(mix.volume_ul) {
        return invalid(MixField::Volume);
    }
    if mix.repetitions_per_point == 0 {
        return invalid(MixField::Repetitions);
    }
    if !is_non_negative(mix.radius_mm) {
        return invalid(MixField::Radius);
    }
    if !is_non_negative(mix.depth_from_bottom_mm) {
        return invalid(MixField::Depth);
    }
    if !is_positive(mix.rate) {
        return invalid(MixField::Rate);
    }

    Ok(())
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(s: &str) -> WellLabel {
        WellLabel::parse(s).unwrap()
    }

    fn tips(labels: &[&str]) -> TipQueue {
        let mut queue = TipQueue::new();
        for label in labels {
            queue.push(TipId(well(label))).unwrap();
        }
        queue
    }

    fn grids() -> PlanGrids {
        PlanGrids {
            source: PlateGrid::new(3, 4),
            destination: PlateGrid::new(3, 4),
            tiprack: PlateGrid::new(8, 12),
        }
    }

    fn transfer(source: &str, dest: &str, volume_ul: f32) -> TransferRequest {
        TransferRequest::new(well(source), well(dest), volume_ul)
    }

    #[test]
    fn test_valid_plan() {
        let transfers = [transfer("A1", "A1", 1000.0), transfer("B1", "B1", 1000.0)];
        let result = validate(&transfers, &tips(&["A1", "B1"]), &MixParameters::default(), &grids());
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_extra_tips_allowed() {
        let transfers = [transfer("A1", "A1", 500.0)];
        let result = validate(&transfers, &tips(&["A1", "B1", "C1"]), &MixParameters::default(), &grids());
        assert!(result.is_ok());
    }

    #[test]
    fn test_insufficient_tips() {
        let transfers = [transfer("A1", "A1", 1000.0), transfer("B1", "B1", 1000.0)];
        let result = validate(&transfers, &tips(&["A1"]), &MixParameters::default(), &grids());
        assert_eq!(
            result,
            Err(ValidationError::InsufficientTips {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_source_well_off_plate() {
        // Row D does not exist on a 3x4 plate
        let transfers = [transfer("A1", "A1", 100.0), transfer("D1", "A2", 100.0)];
        let result = validate(&transfers, &tips(&["A1", "B1"]), &MixParameters::default(), &grids());
        assert_eq!(
            result,
            Err(ValidationError::SourceWellOutOfRange {
                index: 1,
                well: well("D1")
            })
        );
    }

    #[test]
    fn test_dest_well_off_plate() {
        let transfers = [transfer("A1", "A5", 100.0)];
        let result = validate(&transfers, &tips(&["A1"]), &MixParameters::default(), &grids());
        assert_eq!(
            result,
            Err(ValidationError::DestWellOutOfRange {
                index: 0,
                well: well("A5")
            })
        );
    }

    #[test]
    fn test_non_positive_volume() {
        for volume in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let transfers = [transfer("A1", "A1", volume)];
            let result = validate(&transfers, &tips(&["A1"]), &MixParameters::default(), &grids());
            assert_eq!(result, Err(ValidationError::InvalidVolume { index: 0 }));
        }
    }

    #[test]
    fn test_duplicate_tip() {
        let transfers = [transfer("A1", "A1", 100.0), transfer("B1", "B1", 100.0)];
        let result = validate(&transfers, &tips(&["A1", "A1"]), &MixParameters::default(), &grids());
        assert_eq!(
            result,
            Err(ValidationError::DuplicateTip {
                position: 1,
                tip: TipId(well("A1"))
            })
        );
    }

    #[test]
    fn test_tip_off_rack() {
        let transfers = [transfer("A1", "A1", 100.0)];
        let result = validate(&transfers, &tips(&["I1"]), &MixParameters::default(), &grids());
        assert_eq!(
            result,
            Err(ValidationError::TipOutOfRange {
                position: 0,
                tip: TipId(well("I1"))
            })
        );
    }

    #[test]
    fn test_invalid_mix_parameters() {
        let base = MixParameters::default();

        let cases = [
            (MixParameters { volume_ul: 0.0, ..base }, MixField::Volume),
            (MixParameters { repetitions_per_point: 0, ..base }, MixField::Repetitions),
            (MixParameters { radius_mm: -1.0, ..base }, MixField::Radius),
            (MixParameters { depth_from_bottom_mm: f32::NAN, ..base }, MixField::Depth),
            (MixParameters { rate: 0.0, ..base }, MixField::Rate),
        ];

        for (params, field) in cases {
            assert_eq!(
                validate_mix(&params),
                Err(ValidationError::InvalidMixParameter(field))
            );
        }
    }

    #[test]
    fn test_zero_radius_is_valid() {
        let params = MixParameters {
            radius_mm: 0.0,
            ..Default::default()
        };
        assert!(validate_mix(&params).is_ok());
    }

    #[test]
    fn test_validation_is_repeatable() {
        let transfers = [transfer("A1", "A1", 1000.0), transfer("B1", "B1", 1000.0)];
        let queue = tips(&["A1"]);
        let first = validate(&transfers, &queue, &MixParameters::default(), &grids());
        let second = validate(&transfers, &queue, &MixParameters::default(), &grids());
        assert_eq!(first, second);
        assert_eq!(queue.remaining(), 1);
    }

    #[test]
    fn test_empty_plan_is_valid() {
        let result = validate(&[], &TipQueue::new(), &MixParameters::default(), &grids());
        assert!(result.is_ok());
    }

    #[test]
    fn test_too_many_transfers() {
        let transfers = [transfer("A1", "A1", 100.0); MAX_TRANSFERS + 1];
        let result = validate(&transfers, &tips(&["A1"]), &MixParameters::default(), &grids());
        assert_eq!(result, Err(ValidationError::TooManyTransfers { count: 97 }));
    }
}
