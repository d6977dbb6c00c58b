//! Protocol loading
//!
//! Reads a protocol file when one is given, otherwise falls back to the
//! protocol embedded at build time.

use std::fs;
use std::path::{Path, PathBuf};

use compass_core::config::ProtocolConfig;
use thiserror::Error;
use tracing::{debug, info};

use super::toml::{parse_protocol, ParseError};

/// Default protocol compiled into the binary
///
/// Edit protocol.toml and rebuild to change it.
pub const EMBEDDED_PROTOCOL: &str = include_str!("../../protocol.toml");

/// Protocol loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ParseError,
    },
}

/// Load a protocol from `path`, or the embedded default when `None`
pub fn load_protocol(path: Option<&Path>) -> Result<ProtocolConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading protocol");
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_protocol(&text).map_err(|source| ConfigError::Parse {
                origin: path.display().to_string(),
                source,
            })?
        }
        None => {
            info!("Loading embedded protocol");
            parse_protocol(EMBEDDED_PROTOCOL).map_err(|source| ConfigError::Parse {
                origin: "embedded protocol".into(),
                source,
            })?
        }
    };

    log_protocol_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded protocol
fn log_protocol_summary(config: &ProtocolConfig) {
    info!(
        transfers = config.transfers.len(),
        tips = config.tips.len(),
        "Protocol loaded"
    );
    debug!(
        "  source: {} in slot {}",
        config.source.load_name, config.source.slot
    );
    debug!(
        "  destination: {} in slot {}",
        config.destination.load_name, config.destination.slot
    );
    debug!(
        "  tiprack: {} in slot {}",
        config.tiprack.load_name, config.tiprack.slot
    );
    debug!(
        "  pipette: {} on {:?} mount",
        config.pipette.model, config.pipette.mount
    );
    debug!(
        "  mix: {} uL x{} per point, radius {} mm, {} mm from bottom, rate {}",
        config.mix.volume_ul,
        config.mix.repetitions_per_point,
        config.mix.radius_mm,
        config.mix.depth_from_bottom_mm,
        config.mix.rate
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded() {
        let config = load_protocol(None).unwrap();
        assert_eq!(config.transfers.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_protocol(Some(Path::new("/nonexistent/protocol.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/protocol.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("compass-{}.toml", std::process::id()));
        let text = EMBEDDED_PROTOCOL.replace("radius_mm = 7.5", "radius_mm = 3.0");
        fs::write(&path, text).unwrap();

        let config = load_protocol(Some(&path));
        let _ = fs::remove_file(&path);

        assert_eq!(config.unwrap().mix.radius_mm, 3.0);
    }

    #[test]
    fn test_parse_error_names_origin() {
        let path = std::env::temp_dir().join(format!("compass-bad-{}.toml", std::process::id()));
        fs::write(&path, "[source]\nslot = \"one\"\n").unwrap();

        let err = load_protocol(Some(&path)).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }
}
