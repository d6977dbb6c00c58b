//! Build script for compass-runner
//!
//! Validates the embedded protocol.toml at compile time so a broken default
//! protocol never ships.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_protocol();
}

/// Print a boxed error report and abort the build
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_protocol() {
    println!("cargo:rerun-if-changed=protocol.toml");

    let path = Path::new("protocol.toml");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read protocol.toml", &[e.to_string()]),
    };

    let protocol: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in protocol.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_labware(&protocol, &mut errors);
    validate_mix(&protocol, &mut errors);
    let transfers = validate_transfers(&protocol, &mut errors);
    let tips = validate_tips(&protocol, &mut errors);

    if tips < transfers {
        errors.push(format!("{} transfers but only {} tips", transfers, tips));
    }

    if !errors.is_empty() {
        fail("Invalid protocol.toml", &errors);
    }
}

/// Check labware sections and that no two share a deck slot
fn validate_labware(protocol: &toml::Value, errors: &mut Vec<String>) {
    let mut slots = Vec::new();

    for section in ["source", "destination", "tiprack"] {
        let table = match protocol.get(section).and_then(|s| s.as_table()) {
            Some(t) => t,
            None => {
                errors.push(format!("missing [{}]", section));
                continue;
            }
        };

        if !matches!(table.get("load_name"), Some(toml::Value::String(_))) {
            errors.push(format!("[{}] missing 'load_name'", section));
        }

        match table.get("slot") {
            Some(toml::Value::Integer(slot)) if (1..=11).contains(slot) => {
                if slots.contains(slot) {
                    errors.push(format!("[{}] slot {} already used", section, slot));
                }
                slots.push(*slot);
            }
            Some(_) => errors.push(format!("[{}] slot must be 1-11", section)),
            None => errors.push(format!("[{}] missing 'slot'", section)),
        }
    }

    match protocol.get("pipette").and_then(|p| p.as_table()) {
        Some(pipette) => {
            if pipette.get("model").is_none() {
                errors.push("[pipette] missing 'model'".into());
            }
            if let Some(toml::Value::String(mount)) = pipette.get("mount") {
                if !["left", "right"].contains(&mount.as_str()) {
                    errors.push("[pipette] mount must be 'left' or 'right'".into());
                }
            }
        }
        None => errors.push("missing [pipette]".into()),
    }
}

fn validate_mix(protocol: &toml::Value, errors: &mut Vec<String>) {
    let mix = match protocol.get("mix").and_then(|m| m.as_table()) {
        Some(t) => t,
        None => return,
    };

    for key in ["volume_ul", "rate"] {
        if let Some(value) = mix.get(key).and_then(number) {
            if value <= 0.0 {
                errors.push(format!("[mix] {} must be positive", key));
            }
        }
    }
    for key in ["radius_mm", "depth_from_bottom_mm"] {
        if let Some(value) = mix.get(key).and_then(number) {
            if value < 0.0 {
                errors.push(format!("[mix] {} cannot be negative", key));
            }
        }
    }
    if let Some(toml::Value::Integer(reps)) = mix.get("repetitions_per_point") {
        if !(1..=255).contains(reps) {
            errors.push("[mix] repetitions_per_point must be 1-255".into());
        }
    }
}

/// Returns the number of transfers
fn validate_transfers(protocol: &toml::Value, errors: &mut Vec<String>) -> usize {
    let transfers = match protocol.get("transfer") {
        Some(toml::Value::Array(items)) => items,
        Some(_) => {
            errors.push("[[transfer]] must be an array of tables".into());
            return 0;
        }
        None => return 0,
    };

    for (i, transfer) in transfers.iter().enumerate() {
        for key in ["source", "dest"] {
            match transfer.get(key) {
                Some(toml::Value::String(label)) if is_well_label(label) => {}
                Some(_) => errors.push(format!("transfer {} has invalid '{}' well", i, key)),
                None => errors.push(format!("transfer {} missing '{}'", i, key)),
            }
        }
        match transfer.get("volume_ul").and_then(number) {
            Some(v) if v > 0.0 => {}
            _ => errors.push(format!("transfer {} needs a positive 'volume_ul'", i)),
        }
    }

    transfers.len()
}

/// Returns the number of tips
fn validate_tips(protocol: &toml::Value, errors: &mut Vec<String>) -> usize {
    let tips = match protocol.get("tiprack").and_then(|t| t.get("tips")) {
        Some(toml::Value::Array(items)) => items,
        Some(_) => {
            errors.push("[tiprack] tips must be an array".into());
            return 0;
        }
        None => return 0,
    };

    for (i, tip) in tips.iter().enumerate() {
        match tip.as_str() {
            Some(label) if is_well_label(label) => {}
            _ => errors.push(format!("[tiprack] tip {} is not a well label", i)),
        }
    }

    tips.len()
}

fn number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

/// One or two letters followed by a column number, e.g. "A1" or "AB12"
fn is_well_label(label: &str) -> bool {
    let label = label.trim();
    let letters = label.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let digits = &label[letters..];

    (1..=2).contains(&letters)
        && !digits.is_empty()
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}
