//! Pre-run plan validation

pub mod plan;

pub use plan::{validate, validate_config, validate_mix, MixField, PlanGrids, ValidationError};
