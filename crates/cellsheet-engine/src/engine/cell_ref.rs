//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between the formula reference form
//! (e.g., "A1", "B2", "AA100") and zero-indexed column/row coordinates.
//!
//! Formula references are strict: one or two uppercase column letters
//! followed by the 1-based row digits.
//!
//! # Examples
//!
//! ```
//! use cellsheet_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column and row indices (0-indexed).
///
/// Equality is positional, so two references to the same slot are the same
/// cell regardless of what the slot holds.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]{1,2})(?<numbers>[0-9]+)$")
            .expect("cell reference regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a reference in formula notation (e.g., "A1", "ZZ40").
    /// Returns None if the text is not a well-formed reference.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = reference_re().captures(name)?;
        let col = Self::letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// Decode column letters to a 0-based index: `A` is 0, `Z` is 25 and a
    /// two-letter `XY` is `(X - 'A' + 1) * 26 + (Y - 'A' + 1) - 1`.
    fn letters_to_col(letters: &str) -> Option<usize> {
        let mut col_acc = 0usize;
        for c in letters.bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        col_acc.checked_sub(1)
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Whether this reference addresses a slot inside a `rows x cols` grid.
    pub fn within(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_parse_single_letter_columns() {
        assert_eq!(CellRef::parse("A1"), Some(CellRef::new(0, 0)));
        assert_eq!(CellRef::parse("B1"), Some(CellRef::new(1, 0)));
        assert_eq!(CellRef::parse("Z1"), Some(CellRef::new(25, 0)));
    }

    #[test]
    fn test_parse_two_letter_columns() {
        // AA = (1 * 26) + 1 = 27th column
        assert_eq!(CellRef::parse("AA1").unwrap().col, 26);
        assert_eq!(CellRef::parse("AB1").unwrap().col, 27);
        assert_eq!(CellRef::parse("BA1").unwrap().col, 52);
        assert_eq!(CellRef::parse("ZZ1").unwrap().col, 701);
    }

    #[test]
    fn test_parse_row_digits() {
        assert_eq!(CellRef::parse("A10").unwrap().row, 9);
        assert_eq!(CellRef::parse("C100").unwrap().row, 99);
        assert_eq!(CellRef::parse("C007").unwrap().row, 6);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CellRef::parse("").is_none());
        assert!(CellRef::parse("123").is_none());
        assert!(CellRef::parse("ABC1").is_none());
        assert!(CellRef::parse("A0").is_none());
        assert!(CellRef::parse("1A").is_none());
        assert!(CellRef::parse("a1").is_none());
        assert!(CellRef::parse("A 1").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["A1", "Z9", "AA10", "ZZ702"] {
            assert_eq!(CellRef::parse(name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellRef::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_within_bounds() {
        let c3 = CellRef::parse("C3").unwrap();
        assert!(c3.within(3, 3));
        assert!(!c3.within(2, 3));
        assert!(!c3.within(3, 2));
    }
}
