//! Plate frame offsets and the compass pattern
//!
//! Offsets are expressed in millimeters relative to a well's nominal
//! center: +x is east, +y is north, +z is up.

use core::ops::{Add, Neg};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of points in the compass pattern
pub const COMPASS_POINTS: usize = 5;

/// Shift applied to a plate's spatial frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset {
    /// East/west shift (mm)
    pub x: f32,
    /// North/south shift (mm)
    pub y: f32,
    /// Vertical shift (mm)
    pub z: f32,
}

impl Offset {
    /// The un-offset frame
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create an offset
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Check whether this offset leaves the frame untouched
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// One position of the compass mixing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompassPoint {
    /// Nominal well center
    Center,
    /// +y
    North,
    /// -y
    South,
    /// +x
    East,
    /// -x
    West,
}

impl CompassPoint {
    /// Points in execution order
    ///
    /// Every radial point is entered from the center axis, which keeps the
    /// travel between consecutive points bounded by twice the radius.
    pub const ALL: [CompassPoint; COMPASS_POINTS] = [
        CompassPoint::Center,
        CompassPoint::North,
        CompassPoint::South,
        CompassPoint::East,
        CompassPoint::West,
    ];

    /// Offset of this point for the given radius
    pub fn offset(self, radius_mm: f32) -> Offset {
        match self {
            CompassPoint::Center => Offset::ZERO,
            CompassPoint::North => Offset::new(0.0, radius_mm, 0.0),
            CompassPoint::South => Offset::new(0.0, -radius_mm, 0.0),
            CompassPoint::East => Offset::new(radius_mm, 0.0, 0.0),
            CompassPoint::West => Offset::new(-radius_mm, 0.0, 0.0),
        }
    }

    /// Short display name
    pub fn name(self) -> &'static str {
        match self {
            CompassPoint::Center => "center",
            CompassPoint::North => "north",
            CompassPoint::South => "south",
            CompassPoint::East => "east",
            CompassPoint::West => "west",
        }
    }
}

/// Offsets for the five compass points, in execution order
///
/// A radius of zero collapses every point onto the center.
pub fn compass_offsets(radius_mm: f32) -> [Offset; COMPASS_POINTS] {
    CompassPoint::ALL.map(|point| point.offset(radius_mm))
}
