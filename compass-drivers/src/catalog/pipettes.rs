//! Pipette definitions

/// Known pipette model
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipetteDefinition {
    /// Model name used in protocol configuration
    pub model: &'static str,
    /// Smallest volume the pipette handles accurately (µL)
    pub min_volume_ul: f32,
    /// Largest volume the pipette can hold (µL)
    pub max_volume_ul: f32,
}

/// Built-in pipette definitions
pub const PIPETTES: &[PipetteDefinition] = &[
    PipetteDefinition {
        model: "p20_single_gen2",
        min_volume_ul: 1.0,
        max_volume_ul: 20.0,
    },
    PipetteDefinition {
        model: "p300_single_gen2",
        min_volume_ul: 20.0,
        max_volume_ul: 300.0,
    },
    PipetteDefinition {
        model: "p1000_single_gen2",
        min_volume_ul: 100.0,
        max_volume_ul: 1000.0,
    },
];

/// Find a pipette definition by model name
pub fn find_pipette(model: &str) -> Option<&'static PipetteDefinition> {
    PIPETTES.iter().find(|def| def.model == model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_p1000() {
        let def = find_pipette("p1000_single_gen2").unwrap();
        assert_eq!(def.max_volume_ul, 1000.0);
    }

    #[test]
    fn test_unknown_pipette() {
        assert!(find_pipette("p1000_multi_gen3").is_none());
    }
}
