//! Well geometry
//!
//! Well labels, plate grids and the offset model used by the compass
//! mixing pattern.

pub mod offset;
pub mod well;

pub use offset::{compass_offsets, CompassPoint, Offset, COMPASS_POINTS};
pub use well::{PlateGrid, WellLabel, WellLabelError, MAX_ROWS};
