//! Well labels and plate grids
//!
//! A well label is a row (one or two letters) followed by a 1-based column
//! number, e.g. `A1`, `H12` or `AA3` for very large plates. Labels are
//! stored as numeric row/column indices so comparisons and grid checks are
//! cheap and allocation-free.

use core::fmt;
use core::str::FromStr;

/// Number of single-letter rows (A..Z)
const LETTERS: u16 = 26;

/// Highest row count addressable with two-letter rows (A..Z, AA..ZZ)
pub const MAX_ROWS: u16 = LETTERS + LETTERS * LETTERS;

/// Errors produced when parsing a well label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WellLabelError {
    /// Label was empty
    Empty,
    /// Label does not start with a row letter
    MissingRow,
    /// More than two row letters
    RowTooLong,
    /// No column number after the row letters
    MissingColumn,
    /// Column is not a positive number without leading zeros
    InvalidColumn,
}

impl fmt::Display for WellLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            WellLabelError::Empty => "well label is empty",
            WellLabelError::MissingRow => "well label must start with a row letter",
            WellLabelError::RowTooLong => "well row must be one or two letters",
            WellLabelError::MissingColumn => "well label has no column number",
            WellLabelError::InvalidColumn => "well column must be a positive number",
        };
        f.write_str(msg)
    }
}

/// Row-letter + column-number reference into a plate or rack grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WellLabel {
    /// 0-based row index (A = 0)
    row: u16,
    /// 1-based column number
    column: u16,
}

impl WellLabel {
    /// Build a label from a 0-based row index and a 1-based column
    pub const fn new(row: u16, column: u16) -> Option<Self> {
        if row >= MAX_ROWS || column == 0 {
            return None;
        }
        Some(Self { row, column })
    }

    /// Parse a label such as `"A1"` or `"h12"`
    ///
    /// Row letters are case-insensitive; the column must not have a leading
    /// zero.
    pub fn parse(label: &str) -> Result<Self, WellLabelError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(WellLabelError::Empty);
        }

        let bytes = label.as_bytes();
        let letters = bytes.iter().take_while(|b| b.is_ascii_alphabetic()).count();
        let letter_index = |b: u8| (b.to_ascii_uppercase() - b'A') as u16;

        let row = match letters {
            0 => return Err(WellLabelError::MissingRow),
            1 => letter_index(bytes[0]),
            2 => LETTERS + letter_index(bytes[0]) * LETTERS + letter_index(bytes[1]),
            _ => return Err(WellLabelError::RowTooLong),
        };

        let digits = &label[letters..];
        if digits.is_empty() {
            return Err(WellLabelError::MissingColumn);
        }
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WellLabelError::InvalidColumn);
        }
        let column = digits
            .parse::<u16>()
            .map_err(|_| WellLabelError::InvalidColumn)?;

        Ok(Self { row, column })
    }

    /// 0-based row index
    pub const fn row(&self) -> u16 {
        self.row
    }

    /// 1-based column number
    pub const fn column(&self) -> u16 {
        self.column
    }
}

impl FromStr for WellLabel {
    type Err = WellLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = |index: u16| (b'A' + index as u8) as char;

        if self.row < LETTERS {
            write!(f, "{}", letter(self.row))?;
        } else {
            let rest = self.row - LETTERS;
            write!(f, "{}{}", letter(rest / LETTERS), letter(rest % LETTERS))?;
        }
        write!(f, "{}", self.column)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for WellLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for WellLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl<'de> serde::de::Visitor<'de> for LabelVisitor {
            type Value = WellLabel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a well label such as \"A1\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<WellLabel, E> {
                WellLabel::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(LabelVisitor)
    }
}

/// Row/column extent of a plate or tip rack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlateGrid {
    /// Number of rows (A, B, ...)
    pub rows: u16,
    /// Number of columns (1, 2, ...)
    pub columns: u16,
}

impl PlateGrid {
    /// Create a grid
    pub const fn new(rows: u16, columns: u16) -> Self {
        Self { rows, columns }
    }

    /// Check whether a label names a well on this grid
    pub const fn contains(&self, well: WellLabel) -> bool {
        well.row < self.rows && well.column <= self.columns
    }

    /// Total number of wells
    pub const fn well_count(&self) -> u32 {
        self.rows as u32 * self.columns as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> WellLabel {
        WellLabel::parse(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let well = label("A1");
        assert_eq!(well.row(), 0);
        assert_eq!(well.column(), 1);

        let well = label("H12");
        assert_eq!(well.row(), 7);
        assert_eq!(well.column(), 12);
    }

    #[test]
    fn test_parse_lowercase_and_whitespace() {
        assert_eq!(label(" b3 "), label("B3"));
    }

    #[test]
    fn test_parse_two_letter_rows() {
        assert_eq!(label("AA1").row(), 26);
        assert_eq!(label("AF48").row(), 31);
        assert_eq!(label("ZZ1").row(), MAX_ROWS - 1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(WellLabel::parse(""), Err(WellLabelError::Empty));
        assert_eq!(WellLabel::parse("12"), Err(WellLabelError::MissingRow));
        assert_eq!(WellLabel::parse("ABC1"), Err(WellLabelError::RowTooLong));
        assert_eq!(WellLabel::parse("A"), Err(WellLabelError::MissingColumn));
        assert_eq!(WellLabel::parse("A0"), Err(WellLabelError::InvalidColumn));
        assert_eq!(WellLabel::parse("A01"), Err(WellLabelError::InvalidColumn));
        assert_eq!(WellLabel::parse("A1x"), Err(WellLabelError::InvalidColumn));
        assert_eq!(WellLabel::parse("A99999"), Err(WellLabelError::InvalidColumn));
    }

    #[test]
    fn test_new_bounds() {
        assert!(WellLabel::new(0, 0).is_none());
        assert!(WellLabel::new(MAX_ROWS, 1).is_none());
        assert_eq!(WellLabel::new(1, 4), Some(label("B4")));
    }

    #[test]
    fn test_grid_contains() {
        // 12-well plate: 3 rows x 4 columns
        let grid = PlateGrid::new(3, 4);
        assert_eq!(grid.well_count(), 12);
        assert!(grid.contains(label("A1")));
        assert!(grid.contains(label("C4")));
        assert!(!grid.contains(label("D1")));
        assert!(!grid.contains(label("A5")));
    }
}
