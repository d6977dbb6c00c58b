//! Labware definitions
//!
//! Only the well grid is modeled; well spacing and depth belong to the
//! instrument's own labware library.

use compass_core::geometry::PlateGrid;

/// What a definition describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LabwareKind {
    /// Well plate or reservoir
    Plate,
    /// Tip rack
    TipRack,
}

/// Known labware type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LabwareDefinition {
    /// Load name used in protocol configuration
    pub load_name: &'static str,
    /// Plate or tip rack
    pub kind: LabwareKind,
    /// Well grid
    pub grid: PlateGrid,
}

const fn plate(load_name: &'static str, rows: u16, columns: u16) -> LabwareDefinition {
    LabwareDefinition {
        load_name,
        kind: LabwareKind::Plate,
        grid: PlateGrid::new(rows, columns),
    }
}

const fn tiprack(load_name: &'static str) -> LabwareDefinition {
    LabwareDefinition {
        load_name,
        kind: LabwareKind::TipRack,
        grid: PlateGrid::new(8, 12),
    }
}

/// Built-in labware definitions
pub const LABWARE: &[LabwareDefinition] = &[
    plate("corning_6_wellplate_16.8ml_flat", 2, 3),
    plate("corning_12_wellplate_6.9ml_flat", 3, 4),
    plate("corning_24_wellplate_3.4ml_flat", 4, 6),
    plate("corning_48_wellplate_1.6ml_flat", 6, 8),
    plate("corning_96_wellplate_360ul_flat", 8, 12),
    plate("corning_384_wellplate_112ul_flat", 16, 24),
    plate("nest_96_wellplate_200ul_flat", 8, 12),
    plate("nest_12_reservoir_15ml", 1, 12),
    tiprack("opentrons_96_tiprack_20ul"),
    tiprack("opentrons_96_tiprack_300ul"),
    tiprack("opentrons_96_tiprack_1000ul"),
    tiprack("opentrons_96_filtertiprack_20ul"),
    tiprack("opentrons_96_filtertiprack_200ul"),
    tiprack("opentrons_96_filtertiprack_1000ul"),
];

/// Find a labware definition by load name
pub fn find_labware(load_name: &str) -> Option<&'static LabwareDefinition> {
    LABWARE.iter().find(|def| def.load_name == load_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_twelve_well_plate() {
        let def = find_labware("corning_12_wellplate_6.9ml_flat").unwrap();
        assert_eq!(def.kind, LabwareKind::Plate);
        assert_eq!(def.grid.well_count(), 12);
    }

    #[test]
    fn test_find_tiprack() {
        let def = find_labware("opentrons_96_filtertiprack_1000ul").unwrap();
        assert_eq!(def.kind, LabwareKind::TipRack);
        assert_eq!(def.grid.well_count(), 96);
    }

    #[test]
    fn test_unknown_labware() {
        assert!(find_labware("corning_12_wellplate").is_none());
    }

    #[test]
    fn test_load_names_unique() {
        for (i, def) in LABWARE.iter().enumerate() {
            assert!(!LABWARE[..i].iter().any(|d| d.load_name == def.load_name));
        }
    }
}
