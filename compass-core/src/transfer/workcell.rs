//! Loaded hardware handles for one run

use crate::config::ProtocolConfig;
use crate::traits::{Deck, HardwareFault, Labware, Pipette};
use crate::validate::PlanGrids;

/// Plates, tip rack and pipette placed on the deck
///
/// Handles are passed explicitly to the executor; nothing reaches them
/// through shared state.
#[derive(Debug)]
pub struct Workcell<L, P> {
    /// Plate liquid is drawn from
    pub source: L,
    /// Plate liquid is delivered to
    pub destination: L,
    /// Tip rack
    pub tiprack: L,
    /// Pipette
    pub pipette: P,
}

impl<L: Labware, P: Pipette> Workcell<L, P> {
    /// Place everything the configuration names on the deck
    ///
    /// Setup only; no motion happens here.
    pub fn load<D>(deck: &mut D, config: &ProtocolConfig) -> Result<Self, HardwareFault>
    where
        D: Deck<Labware = L, Pipette = P>,
    {
        let source = deck.load_labware(&config.source.load_name, config.source.slot)?;
        let destination =
            deck.load_labware(&config.destination.load_name, config.destination.slot)?;
        let tiprack = deck.load_tiprack(&config.tiprack.load_name, config.tiprack.slot)?;
        let pipette = deck.load_instrument(&config.pipette.model, config.pipette.mount, &tiprack)?;

        Ok(Self {
            source,
            destination,
            tiprack,
            pipette,
        })
    }

    /// Well grids of the loaded labware, for validation
    pub fn grids(&self) -> PlanGrids {
        PlanGrids {
            source: self.source.grid(),
            destination: self.destination.grid(),
            tiprack: self.tiprack.grid(),
        }
    }
}
