//! Simulated deck, labware and pipette
//!
//! Checks the same preconditions a real liquid handler enforces (known
//! definitions, free slots, tip state, pipette capacity) and records every
//! accepted command in a shared [`CommandLog`].
//!
//! # Example
//!
//! ```
//! use compass_core::traits::{Deck, Labware, Mount, Pipette};
//! use compass_core::geometry::WellLabel;
//! use compass_drivers::sim::{CommandLog, SimDeck};
//!
//! let log = CommandLog::new();
//! let mut deck = SimDeck::new(&log);
//! let rack = deck.load_tiprack("opentrons_96_tiprack_1000ul", 4).unwrap();
//! let mut pipette = deck.load_instrument("p1000_single_gen2", Mount::Left, &rack).unwrap();
//!
//! let a1 = WellLabel::new(0, 1).unwrap();
//! pipette.pick_up_tip(&rack.top(a1, 0.0).unwrap()).unwrap();
//! assert!(pipette.has_tip());
//! ```

use compass_core::geometry::{Offset, PlateGrid, WellLabel};
use compass_core::tips::MAX_TIPS;
use compass_core::traits::{Deck, HardwareFault, Labware, Location, Mount, Pipette};
use heapless::Vec;

use super::log::{Command, CommandLog};
use crate::catalog::{find_labware, find_pipette, LabwareKind, PipetteDefinition};

/// Number of deck slots, numbered from 1
pub const DECK_SLOTS: u8 = 11;

/// Slack allowed when comparing dispensed against held volume (µL)
const VOLUME_EPSILON_UL: f32 = 1e-3;

/// Simulated deck
#[derive(Debug)]
pub struct SimDeck<'a> {
    log: &'a CommandLog,
    occupied: [bool; DECK_SLOTS as usize],
    left_mounted: bool,
    right_mounted: bool,
}

impl<'a> SimDeck<'a> {
    /// Create an empty deck recording into `log`
    pub fn new(log: &'a CommandLog) -> Self {
        Self {
            log,
            occupied: [false; DECK_SLOTS as usize],
            left_mounted: false,
            right_mounted: false,
        }
    }

    fn place(
        &mut self,
        load_name: &str,
        slot: u8,
        kind: LabwareKind,
    ) -> Result<SimLabware<'a>, HardwareFault> {
        let def = find_labware(load_name)
            .filter(|def| def.kind == kind)
            .ok_or(HardwareFault::UnknownDefinition)?;

        if slot == 0 || slot > DECK_SLOTS {
            return Err(HardwareFault::InvalidSlot);
        }
        let idx = (slot - 1) as usize;
        if self.occupied[idx] {
            return Err(HardwareFault::SlotOccupied);
        }

        self.log.record(Command::LoadLabware { slot, kind })?;
        self.occupied[idx] = true;

        Ok(SimLabware {
            log: self.log,
            slot,
            grid: def.grid,
            offset: Offset::ZERO,
        })
    }
}

impl<'a> Deck for SimDeck<'a> {
    type Labware = SimLabware<'a>;
    type Pipette = SimPipette<'a>;

    fn load_labware(&mut self, load_name: &str, slot: u8) -> Result<SimLabware<'a>, HardwareFault> {
        self.place(load_name, slot, LabwareKind::Plate)
    }

    fn load_tiprack(&mut self, load_name: &str, slot: u8) -> Result<SimLabware<'a>, HardwareFault> {
        self.place(load_name, slot, LabwareKind::TipRack)
    }

    /// A second pipette on an occupied mount reports `SlotOccupied`
    fn load_instrument(
        &mut self,
        model: &str,
        mount: Mount,
        tiprack: &SimLabware<'a>,
    ) -> Result<SimPipette<'a>, HardwareFault> {
        let def = find_pipette(model).ok_or(HardwareFault::UnknownDefinition)?;

        let mounted = match mount {
            Mount::Left => &mut self.left_mounted,
            Mount::Right => &mut self.right_mounted,
        };
        if *mounted {
            return Err(HardwareFault::SlotOccupied);
        }

        self.log.record(Command::LoadInstrument { mount })?;
        *mounted = true;

        Ok(SimPipette {
            log: self.log,
            def: *def,
            tiprack_slot: tiprack.slot,
            tiprack_grid: tiprack.grid,
            tip: None,
            used: Vec::new(),
            held_ul: 0.0,
        })
    }

    fn home(&mut self) -> Result<(), HardwareFault> {
        self.log.record(Command::Home)
    }
}

/// Simulated plate or tip rack
#[derive(Debug)]
pub struct SimLabware<'a> {
    log: &'a CommandLog,
    slot: u8,
    grid: PlateGrid,
    offset: Offset,
}

impl Labware for SimLabware<'_> {
    fn slot(&self) -> u8 {
        self.slot
    }

    fn grid(&self) -> PlateGrid {
        self.grid
    }

    fn offset(&self) -> Offset {
        self.offset
    }

    fn set_offset(&mut self, offset: Offset) -> Result<(), HardwareFault> {
        self.log.record(Command::SetOffset {
            slot: self.slot,
            offset,
        })?;
        self.offset = offset;
        Ok(())
    }
}

/// Simulated single-channel pipette
#[derive(Debug)]
pub struct SimPipette<'a> {
    log: &'a CommandLog,
    def: PipetteDefinition,
    tiprack_slot: u8,
    tiprack_grid: PlateGrid,
    tip: Option<WellLabel>,
    used: Vec<WellLabel, MAX_TIPS>,
    held_ul: f32,
}

impl SimPipette<'_> {
    /// Liquid currently held in the tip (µL)
    pub fn held_volume_ul(&self) -> f32 {
        self.held_ul
    }

    /// Tips picked up so far, in pickup order
    pub fn tips_used(&self) -> &[WellLabel] {
        &self.used
    }

    fn require_tip(&self) -> Result<(), HardwareFault> {
        if self.tip.is_some() {
            Ok(())
        } else {
            Err(HardwareFault::NoTipAttached)
        }
    }

    fn check_volume(&self, volume_ul: f32) -> Result<(), HardwareFault> {
        if volume_ul > self.def.max_volume_ul {
            Err(HardwareFault::VolumeExceeded)
        } else {
            Ok(())
        }
    }
}

impl Pipette for SimPipette<'_> {
    fn pick_up_tip(&mut self, tip: &Location) -> Result<(), HardwareFault> {
        if self.tip.is_some() {
            return Err(HardwareFault::TipAlreadyAttached);
        }
        if tip.slot != self.tiprack_slot || !self.tiprack_grid.contains(tip.well) {
            return Err(HardwareFault::TipPickupFailed);
        }
        // The rack position is empty once its tip has been taken
        if self.used.contains(&tip.well) {
            return Err(HardwareFault::TipPickupFailed);
        }

        self.log.record(Command::PickUpTip { location: *tip })?;
        self.used
            .push(tip.well)
            .map_err(|_| HardwareFault::TipPickupFailed)?;
        self.tip = Some(tip.well);
        self.held_ul = 0.0;
        Ok(())
    }

    fn drop_tip(&mut self) -> Result<(), HardwareFault> {
        self.require_tip()?;
        self.log.record(Command::DropTip)?;
        self.tip = None;
        self.held_ul = 0.0;
        Ok(())
    }

    fn has_tip(&self) -> bool {
        self.tip.is_some()
    }

    fn mix(
        &mut self,
        repetitions: u8,
        volume_ul: f32,
        location: &Location,
        rate: f32,
    ) -> Result<(), HardwareFault> {
        self.require_tip()?;
        self.check_volume(self.held_ul + volume_ul)?;
        self.log.record(Command::Mix {
            repetitions,
            volume_ul,
            location: *location,
            rate,
        })
    }

    fn aspirate(&mut self, volume_ul: f32, location: &Location) -> Result<(), HardwareFault> {
        self.require_tip()?;
        self.check_volume(self.held_ul + volume_ul)?;
        self.log.record(Command::Aspirate {
            volume_ul,
            location: *location,
        })?;
        self.held_ul += volume_ul;
        Ok(())
    }

    fn dispense(&mut self, volume_ul: f32, location: &Location) -> Result<(), HardwareFault> {
        self.require_tip()?;
        if volume_ul > self.held_ul + VOLUME_EPSILON_UL {
            return Err(HardwareFault::VolumeExceeded);
        }
        self.log.record(Command::Dispense {
            volume_ul,
            location: *location,
        })?;
        self.held_ul = (self.held_ul - volume_ul).max(0.0);
        Ok(())
    }

    fn move_to(&mut self, location: &Location) -> Result<(), HardwareFault> {
        self.log.record(Command::MoveTo {
            location: *location,
        })
    }
}
