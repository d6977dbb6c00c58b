//! Command log shared by all simulated hardware handles
//!
//! Every accepted hardware command is appended in issue order. A single
//! fault can be planned for the Nth command of a given kind; that command
//! fails and is not recorded.

use core::cell::{Cell, Ref, RefCell};
use core::fmt;

use compass_core::geometry::Offset;
use compass_core::traits::{Anchor, HardwareFault, Location, Mount};
use heapless::Vec;

use crate::catalog::LabwareKind;

/// Maximum number of commands one log holds
pub const MAX_COMMANDS: usize = 2048;

/// Hardware command accepted by the simulator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    LoadLabware {
        slot: u8,
        kind: LabwareKind,
    },
    LoadInstrument {
        mount: Mount,
    },
    SetOffset {
        slot: u8,
        offset: Offset,
    },
    PickUpTip {
        location: Location,
    },
    DropTip,
    Mix {
        repetitions: u8,
        volume_ul: f32,
        location: Location,
        rate: f32,
    },
    Aspirate {
        volume_ul: f32,
        location: Location,
    },
    Dispense {
        volume_ul: f32,
        location: Location,
    },
    MoveTo {
        location: Location,
    },
    Home,
}

/// Command discriminant, used for counting and fault planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    LoadLabware,
    LoadInstrument,
    SetOffset,
    PickUpTip,
    DropTip,
    Mix,
    Aspirate,
    Dispense,
    MoveTo,
    Home,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::LoadLabware { .. } => CommandKind::LoadLabware,
            Command::LoadInstrument { .. } => CommandKind::LoadInstrument,
            Command::SetOffset { .. } => CommandKind::SetOffset,
            Command::PickUpTip { .. } => CommandKind::PickUpTip,
            Command::DropTip => CommandKind::DropTip,
            Command::Mix { .. } => CommandKind::Mix,
            Command::Aspirate { .. } => CommandKind::Aspirate,
            Command::Dispense { .. } => CommandKind::Dispense,
            Command::MoveTo { .. } => CommandKind::MoveTo,
            Command::Home => CommandKind::Home,
        }
    }

    /// Target of the command, if it has one
    pub fn location(&self) -> Option<&Location> {
        match self {
            Command::PickUpTip { location }
            | Command::Mix { location, .. }
            | Command::Aspirate { location, .. }
            | Command::Dispense { location, .. }
            | Command::MoveTo { location } => Some(location),
            _ => None,
        }
    }

    /// Whether the command moves the gantry or the plunger
    ///
    /// Deck setup and frame changes are bookkeeping only.
    pub fn is_motion(&self) -> bool {
        !matches!(
            self,
            Command::LoadLabware { .. } | Command::LoadInstrument { .. } | Command::SetOffset { .. }
        )
    }
}

struct LocationDisplay<'a>(&'a Location);

impl fmt::Display for LocationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = self.0;
        let anchor = match loc.anchor {
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
        };
        write!(
            f,
            "slot {} {} {}{:+.1}",
            loc.slot, loc.well, anchor, loc.height_mm
        )?;
        if !loc.offset.is_zero() {
            write!(
                f,
                " offset ({:.1}, {:.1}, {:.1})",
                loc.offset.x, loc.offset.y, loc.offset.z
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LoadLabware { slot, kind } => write!(f, "load {:?} in slot {}", kind, slot),
            Command::LoadInstrument { mount } => write!(f, "load pipette on {:?} mount", mount),
            Command::SetOffset { slot, offset } => write!(
                f,
                "set offset slot {} to ({:.1}, {:.1}, {:.1})",
                slot, offset.x, offset.y, offset.z
            ),
            Command::PickUpTip { location } => {
                write!(f, "pick up tip at {}", LocationDisplay(location))
            }
            Command::DropTip => f.write_str("drop tip"),
            Command::Mix {
                repetitions,
                volume_ul,
                location,
                rate,
            } => write!(
                f,
                "mix {}x {:.1} uL at {} rate {:.1}",
                repetitions,
                volume_ul,
                LocationDisplay(location),
                rate
            ),
            Command::Aspirate {
                volume_ul,
                location,
            } => write!(
                f,
                "aspirate {:.1} uL at {}",
                volume_ul,
                LocationDisplay(location)
            ),
            Command::Dispense {
                volume_ul,
                location,
            } => write!(
                f,
                "dispense {:.1} uL at {}",
                volume_ul,
                LocationDisplay(location)
            ),
            Command::MoveTo { location } => write!(f, "move to {}", LocationDisplay(location)),
            Command::Home => f.write_str("home"),
        }
    }
}

/// Fault injected on the `occurrence`-th command of `kind` (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultPlan {
    pub kind: CommandKind,
    pub occurrence: u16,
    pub fault: HardwareFault,
}

/// Recording shared by a simulated deck and every handle it hands out
#[derive(Default)]
pub struct CommandLog {
    commands: RefCell<Vec<Command, MAX_COMMANDS>>,
    fault: Option<FaultPlan>,
    seen: Cell<u16>,
}

impl CommandLog {
    /// Create an empty log that accepts every command
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log that fails one planned command
    pub fn with_fault(plan: FaultPlan) -> Self {
        Self {
            fault: Some(plan),
            ..Self::default()
        }
    }

    /// Accept or reject a command
    ///
    /// A full log reports a communication fault.
    pub fn record(&self, command: Command) -> Result<(), HardwareFault> {
        if let Some(plan) = self.fault {
            if plan.kind == command.kind() {
                let seen = self.seen.get() + 1;
                self.seen.set(seen);
                if seen == plan.occurrence {
                    return Err(plan.fault);
                }
            }
        }

        self.commands
            .borrow_mut()
            .push(command)
            .map_err(|_| HardwareFault::Communication)
    }

    /// Recorded commands in issue order
    pub fn commands(&self) -> Ref<'_, [Command]> {
        Ref::map(self.commands.borrow(), |cmds| cmds.as_slice())
    }

    /// Number of recorded commands of `kind`
    pub fn count(&self, kind: CommandKind) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|cmd| cmd.kind() == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl fmt::Debug for CommandLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLog")
            .field("commands", &self.len())
            .field("fault", &self.fault)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let log = CommandLog::new();
        log.record(Command::Home).unwrap();
        log.record(Command::DropTip).unwrap();

        let cmds = log.commands();
        assert_eq!(&cmds[..], &[Command::Home, Command::DropTip]);
    }

    #[test]
    fn test_planned_fault_hits_nth_occurrence() {
        let log = CommandLog::with_fault(FaultPlan {
            kind: CommandKind::DropTip,
            occurrence: 2,
            fault: HardwareFault::MotionFailed,
        });

        assert_eq!(log.record(Command::DropTip), Ok(()));
        assert_eq!(log.record(Command::Home), Ok(()));
        assert_eq!(log.record(Command::DropTip), Err(HardwareFault::MotionFailed));
        assert_eq!(log.record(Command::DropTip), Ok(()));
        assert_eq!(log.count(CommandKind::DropTip), 2);
    }

    #[test]
    fn test_motion_classification() {
        assert!(Command::Home.is_motion());
        assert!(Command::DropTip.is_motion());
        assert!(!Command::SetOffset {
            slot: 1,
            offset: Offset::ZERO
        }
        .is_motion());
        assert!(!Command::LoadInstrument { mount: Mount::Left }.is_motion());
    }
}
