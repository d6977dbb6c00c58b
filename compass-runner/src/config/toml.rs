//! TOML protocol document
//!
//! The document is deserialized into std-side raw sections first, then
//! converted into the fixed-capacity [`ProtocolConfig`] so capacity and
//! name-length problems are reported with the offending field.
//!
//! Layout:
//! - `[source]`, `[destination]`: `load_name`, `slot`
//! - `[tiprack]`: `load_name`, `slot`, `tips` (consumed in order)
//! - `[pipette]`: `model`, `mount` ("left" or "right")
//! - `[mix]`, `[motion]`: optional, unspecified keys keep their defaults
//! - `[[transfer]]`: `source`, `dest`, `volume_ul`

use compass_core::config::{
    LabwareConfig, MotionConfig, PipetteConfig, ProtocolConfig, TransferRequest, MAX_NAME_LEN,
    MAX_TRANSFERS,
};
use compass_core::geometry::WellLabel;
use compass_core::mix::MixParameters;
use compass_core::tips::{TipId, MAX_TIPS};
use compass_core::traits::Mount;
use serde::Deserialize;
use thiserror::Error;

/// Error turning TOML text into a protocol
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid protocol TOML: {0}")]
    Toml(#[from] ::toml::de::Error),
    #[error("[{section}] {key} is longer than {max} characters", max = MAX_NAME_LEN)]
    NameTooLong {
        section: &'static str,
        key: &'static str,
    },
    #[error("{count} transfers listed, at most {max} supported", max = MAX_TRANSFERS)]
    TooManyTransfers { count: usize },
    #[error("{count} tips listed, at most {max} supported", max = MAX_TIPS)]
    TooManyTips { count: usize },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProtocol {
    source: RawLabware,
    destination: RawLabware,
    tiprack: RawTiprack,
    pipette: RawPipette,
    #[serde(default)]
    mix: RawMix,
    #[serde(default)]
    motion: RawMotion,
    #[serde(default, rename = "transfer")]
    transfers: Vec<RawTransfer>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLabware {
    load_name: String,
    slot: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTiprack {
    load_name: String,
    slot: u8,
    #[serde(default)]
    tips: Vec<WellLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPipette {
    model: String,
    #[serde(default)]
    mount: Mount,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMix {
    volume_ul: Option<f32>,
    repetitions_per_point: Option<u8>,
    radius_mm: Option<f32>,
    depth_from_bottom_mm: Option<f32>,
    rate: Option<f32>,
}

impl RawMix {
    fn resolve(&self) -> MixParameters {
        let d = MixParameters::default();
        MixParameters {
            volume_ul: self.volume_ul.unwrap_or(d.volume_ul),
            repetitions_per_point: self.repetitions_per_point.unwrap_or(d.repetitions_per_point),
            radius_mm: self.radius_mm.unwrap_or(d.radius_mm),
            depth_from_bottom_mm: self.depth_from_bottom_mm.unwrap_or(d.depth_from_bottom_mm),
            rate: self.rate.unwrap_or(d.rate),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMotion {
    approach_height_mm: Option<f32>,
    travel_height_mm: Option<f32>,
    aspirate_depth_mm: Option<f32>,
    dispense_depth_mm: Option<f32>,
}

impl RawMotion {
    fn resolve(&self) -> MotionConfig {
        let d = MotionConfig::default();
        MotionConfig {
            approach_height_mm: self.approach_height_mm.unwrap_or(d.approach_height_mm),
            travel_height_mm: self.travel_height_mm.unwrap_or(d.travel_height_mm),
            aspirate_depth_mm: self.aspirate_depth_mm.unwrap_or(d.aspirate_depth_mm),
            dispense_depth_mm: self.dispense_depth_mm.unwrap_or(d.dispense_depth_mm),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTransfer {
    source: WellLabel,
    dest: WellLabel,
    volume_ul: f32,
}

fn labware(
    section: &'static str,
    load_name: &str,
    slot: u8,
) -> Result<LabwareConfig, ParseError> {
    LabwareConfig::new(load_name, slot).ok_or(ParseError::NameTooLong {
        section,
        key: "load_name",
    })
}

/// Parse a protocol document
///
/// Only structure and capacity are checked here; plan consistency is the
/// validator's job.
pub fn parse_protocol(input: &str) -> Result<ProtocolConfig, ParseError> {
    let raw: RawProtocol = ::toml::from_str(input)?;

    if raw.transfers.len() > MAX_TRANSFERS {
        return Err(ParseError::TooManyTransfers {
            count: raw.transfers.len(),
        });
    }
    if raw.tiprack.tips.len() > MAX_TIPS {
        return Err(ParseError::TooManyTips {
            count: raw.tiprack.tips.len(),
        });
    }

    let mut config = ProtocolConfig {
        source: labware("source", &raw.source.load_name, raw.source.slot)?,
        destination: labware(
            "destination",
            &raw.destination.load_name,
            raw.destination.slot,
        )?,
        tiprack: labware("tiprack", &raw.tiprack.load_name, raw.tiprack.slot)?,
        pipette: PipetteConfig::new(&raw.pipette.model, raw.pipette.mount).ok_or(
            ParseError::NameTooLong {
                section: "pipette",
                key: "model",
            },
        )?,
        mix: raw.mix.resolve(),
        motion: raw.motion.resolve(),
        ..ProtocolConfig::default()
    };

    // Capacities were checked above
    for t in &raw.transfers {
        let _ = config
            .transfers
            .push(TransferRequest::new(t.source, t.dest, t.volume_ul));
    }
    for well in &raw.tiprack.tips {
        let _ = config.tips.push(TipId(*well));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [source]
        load_name = "corning_12_wellplate_6.9ml_flat"
        slot = 1

        [destination]
        load_name = "corning_24_wellplate_3.4ml_flat"
        slot = 2

        [tiprack]
        load_name = "opentrons_96_tiprack_300ul"
        slot = 3
        tips = ["H12", "g12"]

        [pipette]
        model = "p300_single_gen2"

        [[transfer]]
        source = "A1"
        dest = "D6"
        volume_ul = 150
    "#;

    fn well(s: &str) -> WellLabel {
        WellLabel::parse(s).unwrap()
    }

    #[test]
    fn test_parse_minimal_protocol() {
        let config = parse_protocol(MINIMAL).unwrap();

        assert_eq!(config.source.slot, 1);
        assert_eq!(config.destination.load_name.as_str(), "corning_24_wellplate_3.4ml_flat");
        assert_eq!(config.pipette.mount, Mount::Left);
        assert_eq!(config.transfers.len(), 1);
        assert_eq!(config.transfers[0].dest_well, well("D6"));
        assert_eq!(config.transfers[0].volume_ul, 150.0);

        let tips: Vec<TipId> = config.tips.iter().copied().collect();
        assert_eq!(tips, vec![TipId(well("H12")), TipId(well("G12"))]);

        assert_eq!(config.mix, MixParameters::default());
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn test_partial_mix_keeps_defaults() {
        let input = format!("{}\n[mix]\nradius_mm = 0.0\nrate = 1\n", MINIMAL);
        let config = parse_protocol(&input).unwrap();

        assert_eq!(config.mix.radius_mm, 0.0);
        assert_eq!(config.mix.rate, 1.0);
        assert_eq!(config.mix.repetitions_per_point, 3);
        assert_eq!(config.mix.volume_ul, 1000.0);
    }

    #[test]
    fn test_embedded_protocol_parses() {
        let config = parse_protocol(crate::config::EMBEDDED_PROTOCOL).unwrap();

        assert_eq!(config.transfers.len(), 2);
        assert_eq!(config.tips.len(), 2);
        assert_eq!(config.tiprack.slot, 4);
        assert_eq!(config.mix.depth_from_bottom_mm, 2.5);
        assert_eq!(config.motion.travel_height_mm, 40.0);
    }

    #[test]
    fn test_bad_well_label() {
        let input = MINIMAL.replace("\"D6\"", "\"6D\"");
        assert!(matches!(parse_protocol(&input), Err(ParseError::Toml(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let input = MINIMAL.replace("slot = 3", "slot = 3\nstarting_tip = \"A1\"");
        assert!(matches!(parse_protocol(&input), Err(ParseError::Toml(_))));
    }

    #[test]
    fn test_long_load_name() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let input = MINIMAL.replace("opentrons_96_tiprack_300ul", &long);

        assert!(matches!(
            parse_protocol(&input),
            Err(ParseError::NameTooLong {
                section: "tiprack",
                key: "load_name"
            })
        ));
    }

    #[test]
    fn test_too_many_tips() {
        let tips: Vec<String> = (1..=12)
            .flat_map(|col| ["A", "B", "C", "D", "E", "F", "G", "H", "I"].map(|r| format!("\"{}{}\"", r, col)))
            .collect();
        let input = MINIMAL.replace("[\"H12\", \"g12\"]", &format!("[{}]", tips.join(", ")));

        assert!(matches!(
            parse_protocol(&input),
            Err(ParseError::TooManyTips { count: 108 })
        ));
    }
}
