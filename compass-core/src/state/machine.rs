//! Run state machine
//!
//! Tracks where a protocol run is. Transitions are driven by the events
//! the executor emits, so observers and the executor agree on the state.

use super::events::RunEvent;

/// Run states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Nothing checked yet
    Idle,
    /// Plan validated, no motion yet
    Validated,
    /// Working on the transfer at `index`
    Transferring { index: u8 },
    /// Returning the gantry to rest
    Homing,
    /// Every transfer done and gantry homed
    Complete,
    /// Fatal error; the run will not continue
    Aborted(AbortKind),
}

/// Class of a fatal run error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortKind {
    /// Plan failed validation
    Validation,
    /// Tip queue ran out mid-run
    TipExhausted,
    /// Hardware layer reported a fault
    HardwareFault,
}

impl RunState {
    /// Check whether the run has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Complete | RunState::Aborted(_))
    }

    /// Check whether the run was aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self, RunState::Aborted(_))
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: RunEvent) -> Self {
        match (self, event) {
            // Terminal states absorb everything
            (RunState::Complete, _) | (RunState::Aborted(_), _) => self,

            (_, RunEvent::Aborted(kind)) => RunState::Aborted(kind),

            (RunState::Idle, RunEvent::Validated { .. }) => RunState::Validated,

            (
                RunState::Validated | RunState::Transferring { .. },
                RunEvent::TransferStarted { index, .. },
            ) => RunState::Transferring { index },

            (RunState::Validated | RunState::Transferring { .. }, RunEvent::HomingStarted) => {
                RunState::Homing
            }

            (RunState::Homing, RunEvent::Homed) => RunState::Complete,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WellLabel;

    fn started(index: u8) -> RunEvent {
        let well = WellLabel::parse("A1").unwrap();
        RunEvent::TransferStarted {
            index,
            source: well,
            dest: well,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut state = RunState::Idle;
        state = state.transition(RunEvent::Validated { transfers: 2 });
        assert_eq!(state, RunState::Validated);

        state = state.transition(started(0));
        assert_eq!(state, RunState::Transferring { index: 0 });

        state = state.transition(RunEvent::TransferFinished { index: 0 });
        assert_eq!(state, RunState::Transferring { index: 0 });

        state = state.transition(started(1));
        assert_eq!(state, RunState::Transferring { index: 1 });

        state = state.transition(RunEvent::HomingStarted);
        assert_eq!(state, RunState::Homing);

        state = state.transition(RunEvent::Homed);
        assert_eq!(state, RunState::Complete);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_transfer_requires_validation() {
        let state = RunState::Idle.transition(started(0));
        assert_eq!(state, RunState::Idle);
    }

    #[test]
    fn test_abort_is_terminal() {
        let state = RunState::Transferring { index: 1 }
            .transition(RunEvent::Aborted(AbortKind::TipExhausted));
        assert_eq!(state, RunState::Aborted(AbortKind::TipExhausted));
        assert!(state.is_aborted());

        // Nothing restarts an aborted run
        assert_eq!(state.transition(started(2)), state);
        assert_eq!(state.transition(RunEvent::Homed), state);
    }

    #[test]
    fn test_empty_plan_goes_straight_to_homing() {
        let state = RunState::Validated.transition(RunEvent::HomingStarted);
        assert_eq!(state, RunState::Homing);
    }
}
