//! Events emitted while a protocol runs

use super::machine::AbortKind;
use crate::geometry::{CompassPoint, WellLabel};
use crate::tips::TipId;

/// Progress events, in the order the actions happen
///
/// `index` is the 0-based position of the transfer in the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunEvent {
    // Run lifecycle
    /// Plan passed validation
    Validated { transfers: u8 },
    /// All transfers done, gantry homing
    HomingStarted,
    /// Gantry at rest, run complete
    Homed,
    /// Run stopped on a fatal error
    Aborted(AbortKind),

    // Per-transfer events
    /// Transfer is about to start
    TransferStarted {
        index: u8,
        source: WellLabel,
        dest: WellLabel,
    },
    /// Tip attached
    TipPickedUp { index: u8, tip: TipId },
    /// One compass point mixed
    PointMixed { index: u8, point: CompassPoint },
    /// Source plate frame back at zero
    OffsetReset { index: u8 },
    /// Transfer volume drawn from the source well
    Aspirated { index: u8, volume_ul: f32 },
    /// Transfer volume delivered to the destination well
    Dispensed { index: u8, volume_ul: f32 },
    /// Tip ejected
    TipDropped { index: u8 },
    /// Transfer finished
    TransferFinished { index: u8 },
}
