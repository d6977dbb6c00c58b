//! Configuration loading and parsing
//!
//! Loads the protocol from a TOML file or the embedded default.

pub mod loader;
pub mod toml;

pub use loader::{load_protocol, ConfigError, EMBEDDED_PROTOCOL};
pub use toml::{parse_protocol, ParseError};
