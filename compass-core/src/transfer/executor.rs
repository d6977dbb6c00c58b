//! Transfer executor
//!
//! Drives the per-transfer workflow: tip pickup, compass mix at the source
//! well, aspirate, two-hop travel, dispense, retreat, tip drop. Transfers
//! run strictly in plan order and never overlap.

use super::error::RunError;
use super::workcell::Workcell;
use crate::config::{MotionConfig, ProtocolConfig, TransferRequest, MAX_TRANSFERS};
use crate::geometry::{WellLabel, COMPASS_POINTS};
use crate::mix::{mix_sequence, MixParameters};
use crate::state::{RunEvent, RunState};
use crate::tips::TipQueue;
use crate::traits::{Deck, HardwareFault, Labware, Pipette};
use crate::validate::{validate, PlanGrids, ValidationError};

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// Transfers carried out
    pub transfers: u8,
    /// Tips used
    pub tips_consumed: u16,
    /// Tips left unused in the queue
    pub tips_remaining: u16,
}

/// Sequencing engine for one protocol run
///
/// Holds the shared read-only parameters and the run state. Hardware
/// handles are passed into each call.
#[derive(Debug)]
pub struct TransferExecutor<'c> {
    mix: &'c MixParameters,
    motion: &'c MotionConfig,
    state: RunState,
}

impl<'c> TransferExecutor<'c> {
    /// Create an executor
    pub fn new(mix: &'c MixParameters, motion: &'c MotionConfig) -> Self {
        Self {
            mix,
            motion,
            state: RunState::Idle,
        }
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Validate the plan before any motion
    pub fn validate<O>(
        &mut self,
        transfers: &[TransferRequest],
        tips: &TipQueue,
        grids: &PlanGrids,
        observer: &mut O,
    ) -> Result<(), RunError>
    where
        O: FnMut(&RunEvent),
    {
        match validate(transfers, tips, self.mix, grids) {
            Ok(()) => {
                let count = transfers.len() as u8;
                self.emit(observer, RunEvent::Validated { transfers: count });
                Ok(())
            }
            Err(e) => Err(self.abort(observer, e.into())),
        }
    }

    /// Run every transfer in order
    ///
    /// Stops at the first error. Work already done on earlier transfers
    /// stands; nothing is rolled back. A plan longer than
    /// [`MAX_TRANSFERS`] is rejected before any motion.
    pub fn execute<L, P, O>(
        &mut self,
        cell: &mut Workcell<L, P>,
        transfers: &[TransferRequest],
        tips: &mut TipQueue,
        observer: &mut O,
    ) -> Result<(), RunError>
    where
        L: Labware,
        P: Pipette,
        O: FnMut(&RunEvent),
    {
        if transfers.len() > MAX_TRANSFERS {
            let count = transfers.len().min(u16::MAX as usize) as u16;
            let error = ValidationError::TooManyTransfers { count };
            return Err(self.abort(observer, error.into()));
        }

        for (i, request) in transfers.iter().enumerate() {
            if let Err(e) = self.transfer(i as u8, cell, request, tips, observer) {
                return Err(self.abort(observer, e));
            }
        }
        Ok(())
    }

    /// Return the gantry to rest after the last transfer
    pub fn home<D, O>(&mut self, deck: &mut D, observer: &mut O) -> Result<(), RunError>
    where
        D: Deck,
        O: FnMut(&RunEvent),
    {
        self.emit(observer, RunEvent::HomingStarted);
        if let Err(fault) = deck.home() {
            return Err(self.abort(observer, fault.into()));
        }
        self.emit(observer, RunEvent::Homed);
        Ok(())
    }

    /// Carry out a single transfer
    fn transfer<L, P, O>(
        &mut self,
        index: u8,
        cell: &mut Workcell<L, P>,
        request: &TransferRequest,
        tips: &mut TipQueue,
        observer: &mut O,
    ) -> Result<(), RunError>
    where
        L: Labware,
        P: Pipette,
        O: FnMut(&RunEvent),
    {
        let motion = *self.motion;

        self.emit(
            observer,
            RunEvent::TransferStarted {
                index,
                source: request.source_well,
                dest: request.dest_well,
            },
        );

        // A leftover tip would be carried into this transfer's liquid
        if cell.pipette.has_tip() {
            return Err(HardwareFault::TipAlreadyAttached.into());
        }

        // No motion for this transfer until a fresh tip is secured
        let tip = tips.next_tip()?;
        let tip_location = cell.tiprack.top(tip.well(), 0.0)?;
        cell.pipette.pick_up_tip(&tip_location)?;
        self.emit(observer, RunEvent::TipPickedUp { index, tip });

        let approach = cell.source.top(request.source_well, motion.approach_height_mm)?;
        cell.pipette.move_to(&approach)?;

        self.mix_at_source(index, cell, request.source_well, observer)?;

        let aspirate_at = cell
            .source
            .bottom(request.source_well, motion.aspirate_depth_mm)?;
        cell.pipette.aspirate(request.volume_ul, &aspirate_at)?;
        self.emit(
            observer,
            RunEvent::Aspirated {
                index,
                volume_ul: request.volume_ul,
            },
        );

        // Never cross between plates from the well floor: lift clear of the
        // source first, then cross high above the destination
        let above_source = cell.source.top(request.source_well, motion.approach_height_mm)?;
        cell.pipette.move_to(&above_source)?;
        let above_dest = cell.destination.top(request.dest_well, motion.travel_height_mm)?;
        cell.pipette.move_to(&above_dest)?;

        let dispense_at = cell
            .destination
            .bottom(request.dest_well, motion.dispense_depth_mm)?;
        cell.pipette.dispense(request.volume_ul, &dispense_at)?;
        self.emit(
            observer,
            RunEvent::Dispensed {
                index,
                volume_ul: request.volume_ul,
            },
        );

        cell.pipette.move_to(&above_dest)?;
        cell.pipette.drop_tip()?;
        self.emit(observer, RunEvent::TipDropped { index });

        self.emit(observer, RunEvent::TransferFinished { index });
        Ok(())
    }

    /// Compass mix at the source well
    ///
    /// If a point fails, the frame reset is still attempted before the
    /// original fault is returned.
    fn mix_at_source<L, P, O>(
        &mut self,
        index: u8,
        cell: &mut Workcell<L, P>,
        well: WellLabel,
        observer: &mut O,
    ) -> Result<(), HardwareFault>
    where
        L: Labware,
        P: Pipette,
        O: FnMut(&RunEvent),
    {
        let mix = self.mix;
        let steps = mix_sequence(well, mix);
        let (points, reset) = steps.split_at(COMPASS_POINTS);

        for step in points {
            if let Err(fault) = step.run(&mut cell.source, &mut cell.pipette, mix) {
                let _ = reset[0].run(&mut cell.source, &mut cell.pipette, mix);
                return Err(fault);
            }
            if let Some(point) = step.point() {
                self.emit(observer, RunEvent::PointMixed { index, point });
            }
        }

        reset[0].run(&mut cell.source, &mut cell.pipette, mix)?;
        self.emit(observer, RunEvent::OffsetReset { index });
        Ok(())
    }

    fn emit<O: FnMut(&RunEvent)>(&mut self, observer: &mut O, event: RunEvent) {
        self.state = self.state.transition(event);
        observer(&event);
    }

    fn abort<O: FnMut(&RunEvent)>(&mut self, observer: &mut O, error: RunError) -> RunError {
        self.emit(observer, RunEvent::Aborted(error.kind()));
        error
    }
}

/// Run a complete protocol: load, validate, transfer, home
///
/// `observer` sees every [`RunEvent`] as it happens.
pub fn run_protocol<D, O>(
    deck: &mut D,
    config: &ProtocolConfig,
    observer: &mut O,
) -> Result<RunSummary, RunError>
where
    D: Deck,
    O: FnMut(&RunEvent),
{
    let mut executor = TransferExecutor::new(&config.mix, &config.motion);

    let mut cell = match Workcell::load(deck, config) {
        Ok(cell) => cell,
        Err(fault) => return Err(executor.abort(observer, fault.into())),
    };
    let mut tips = config.tip_queue();

    executor.validate(&config.transfers, &tips, &cell.grids(), observer)?;
    executor.execute(&mut cell, &config.transfers, &mut tips, observer)?;
    executor.home(deck, observer)?;

    Ok(RunSummary {
        transfers: config.transfers.len() as u8,
        tips_consumed: tips.consumed(),
        tips_remaining: tips.remaining() as u16,
    })
}
