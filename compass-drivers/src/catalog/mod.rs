//! Labware and instrument catalog
//!
//! Maps the type names used in protocol configuration to the facts the
//! simulator and validator need.

pub mod labware;
pub mod pipettes;

pub use labware::{find_labware, LabwareDefinition, LabwareKind, LABWARE};
pub use pipettes::{find_pipette, PipetteDefinition, PIPETTES};
