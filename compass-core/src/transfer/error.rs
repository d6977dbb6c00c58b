//! Run errors
//!
//! Every error is fatal to the run. There is no retry: an aspirate or
//! dispense that already happened cannot be undone.

use core::fmt;

use crate::state::AbortKind;
use crate::tips::TipExhausted;
use crate::traits::HardwareFault;
use crate::validate::ValidationError;

/// Fatal protocol run error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunError {
    /// Plan rejected before any motion
    Validation(ValidationError),
    /// Tip queue ran out mid-run
    TipExhausted(TipExhausted),
    /// Hardware layer failure
    Hardware(HardwareFault),
}

impl RunError {
    /// Abort class of this error
    pub fn kind(&self) -> AbortKind {
        match self {
            RunError::Validation(_) => AbortKind::Validation,
            RunError::TipExhausted(_) => AbortKind::TipExhausted,
            RunError::Hardware(_) => AbortKind::HardwareFault,
        }
    }
}

impl From<ValidationError> for RunError {
    fn from(e: ValidationError) -> Self {
        RunError::Validation(e)
    }
}

impl From<TipExhausted> for RunError {
    fn from(e: TipExhausted) -> Self {
        RunError::TipExhausted(e)
    }
}

impl From<HardwareFault> for RunError {
    fn from(e: HardwareFault) -> Self {
        RunError::Hardware(e)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Validation(e) => write!(f, "validation failed: {}", e),
            RunError::TipExhausted(e) => write!(f, "{}", e),
            RunError::Hardware(e) => write!(f, "hardware fault: {}", e),
        }
    }
}
