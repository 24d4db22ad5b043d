//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellKind`] - The classification of a cell's raw text
//! - [`CellContent`] - The raw text plus the kind-specific payload
//! - [`Cell`] - A positioned cell with its content and dependents
//! - [`Grid`] - Dense `rows x cols` storage addressed by [`CellRef`]

use indexmap::IndexSet;

use super::cell_ref::CellRef;
use super::error::FormulaError;
use super::format::format_number;

/// The classification of a cell's content, derived from its raw text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    String,
    Number,
    Formula,
}

impl CellKind {
    /// Classify raw cell text.
    /// - Empty string -> Empty
    /// - Starts with '=' or '@' -> Formula
    /// - Starts with a digit or '-' -> Number
    /// - Otherwise -> String
    pub fn classify(text: &str) -> CellKind {
        match text.chars().next() {
            None => CellKind::Empty,
            Some('=' | '@') => CellKind::Formula,
            Some(c) if c.is_ascii_digit() || c == '-' => CellKind::Number,
            Some(_) => CellKind::String,
        }
    }

    /// Whether cells of this kind take part in range aggregates.
    pub fn is_numeric(self) -> bool {
        matches!(self, CellKind::Number | CellKind::Formula)
    }
}

/// Raw cell text together with the payload its kind needs.
///
/// The variant is always the one [`CellKind::classify`] picks for the raw
/// text, so the kind can never drift from the content.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Empty,
    Text(String),
    Number(String),
    Formula { source: String, value: f64 },
}

impl CellContent {
    /// Build content from raw text. Formulas start from the placeholder value `0`.
    pub fn from_raw(text: &str) -> CellContent {
        match CellKind::classify(text) {
            CellKind::Empty => CellContent::Empty,
            CellKind::String => CellContent::Text(text.to_string()),
            CellKind::Number => CellContent::Number(text.to_string()),
            CellKind::Formula => CellContent::Formula {
                source: text.to_string(),
                value: 0.0,
            },
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellContent::Empty => CellKind::Empty,
            CellContent::Text(_) => CellKind::String,
            CellContent::Number(_) => CellKind::Number,
            CellContent::Formula { .. } => CellKind::Formula,
        }
    }

    /// The raw text exactly as entered.
    pub fn raw(&self) -> &str {
        match self {
            CellContent::Empty => "",
            CellContent::Text(s) | CellContent::Number(s) => s,
            CellContent::Formula { source, .. } => source,
        }
    }
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug)]
pub struct Cell {
    at: CellRef,
    content: CellContent,
    /// Cells whose formula reads this one, in insertion order.
    dependents: IndexSet<CellRef>,
}

impl Cell {
    pub fn new_empty(at: CellRef) -> Cell {
        Cell {
            at,
            content: CellContent::Empty,
            dependents: IndexSet::new(),
        }
    }

    pub fn at(&self) -> CellRef {
        self.at
    }

    /// Replace the raw text and reclassify. Does not evaluate and keeps dependents.
    pub fn set_raw_content(&mut self, text: &str) {
        self.content = CellContent::from_raw(text);
    }

    pub fn content(&self) -> &str {
        self.content.raw()
    }

    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }

    pub fn payload(&self) -> &CellContent {
        &self.content
    }

    /// The computed value rendered as text.
    ///
    /// Number and String cells show their raw text, formulas their evaluated
    /// result and empty cells nothing.
    pub fn value(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(s) | CellContent::Number(s) => s.clone(),
            CellContent::Formula { value, .. } => format_number(*value),
        }
    }

    /// Store a formula's evaluated result.
    /// Returns false (and changes nothing) for non-formula cells, whose value is their text.
    pub fn set_computed_value(&mut self, result: f64) -> bool {
        match &mut self.content {
            CellContent::Formula { value, .. } => {
                *value = result;
                true
            }
            _ => false,
        }
    }

    /// The value as a number, as seen by a formula reading this cell.
    /// Empty and String cells read as `0`.
    pub fn numeric_value(&self) -> Result<f64, FormulaError> {
        match &self.content {
            CellContent::Empty | CellContent::Text(_) => Ok(0.0),
            CellContent::Number(raw) => {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| FormulaError::NotANumber {
                        text: raw.clone(),
                    })
            }
            CellContent::Formula { value, .. } => Ok(*value),
        }
    }

    pub fn dependents(&self) -> &IndexSet<CellRef> {
        &self.dependents
    }

    pub fn has_dependent(&self, target: &CellRef) -> bool {
        self.dependents.contains(target)
    }

    /// Remove `target` from the dependents, if present. Keeps the order of the rest.
    pub fn remove_dependent(&mut self, target: &CellRef) -> bool {
        self.dependents.shift_remove(target)
    }

    pub fn clear_dependents(&mut self) {
        self.dependents.clear();
    }

    pub(crate) fn push_dependent(&mut self, candidate: CellRef) -> bool {
        self.dependents.insert(candidate)
    }
}

/// Fixed-size grid of cells, each pre-assigned its position.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a `rows x cols` grid with every cell empty.
    pub fn new(rows: usize, cols: usize) -> Grid {
        let mut cells = Vec::with_capacity(rows.saturating_mul(cols));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new_empty(CellRef::new(col, row)));
            }
        }
        Grid { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, at: &CellRef) -> bool {
        at.within(self.rows, self.cols)
    }

    fn index(&self, at: &CellRef) -> Option<usize> {
        self.contains(at).then(|| at.row * self.cols + at.col)
    }

    pub fn get(&self, at: &CellRef) -> Option<&Cell> {
        self.index(at).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, at: &CellRef) -> Option<&mut Cell> {
        self.index(at).map(|i| &mut self.cells[i])
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Reset every cell to empty with no dependents.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::new_empty(cell.at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kinds() {
        assert_eq!(CellKind::classify(""), CellKind::Empty);
        assert_eq!(CellKind::classify("=A1+1"), CellKind::Formula);
        assert_eq!(CellKind::classify("@SUM(A1..A3)"), CellKind::Formula);
        assert_eq!(CellKind::classify("42"), CellKind::Number);
        assert_eq!(CellKind::classify("-3.5"), CellKind::Number);
        assert_eq!(CellKind::classify("hello"), CellKind::String);
        assert_eq!(CellKind::classify(" 42"), CellKind::String);
        assert_eq!(CellKind::classify("<A1-CPY(B1..B3)"), CellKind::String);
    }

    #[test]
    fn test_set_raw_content_reclassifies() {
        let mut cell = Cell::new_empty(CellRef::new(0, 0));
        cell.set_raw_content("=1+2");
        assert_eq!(cell.kind(), CellKind::Formula);
        assert_eq!(cell.value(), "0");

        cell.set_raw_content("text");
        assert_eq!(cell.kind(), CellKind::String);
        assert_eq!(cell.value(), "text");

        cell.set_raw_content("");
        assert_eq!(cell.kind(), CellKind::Empty);
        assert_eq!(cell.value(), "");
    }

    #[test]
    fn test_content_is_verbatim() {
        let mut cell = Cell::new_empty(CellRef::new(0, 0));
        for raw in ["007", "-", "1.50", "@SUM(A1..A2)", "  spaced"] {
            cell.set_raw_content(raw);
            assert_eq!(cell.content(), raw);
        }
    }

    #[test]
    fn test_set_computed_value_only_for_formulas() {
        let mut cell = Cell::new_empty(CellRef::new(0, 0));
        cell.set_raw_content("5");
        assert!(!cell.set_computed_value(9.0));
        assert_eq!(cell.value(), "5");

        cell.set_raw_content("=A2");
        assert!(cell.set_computed_value(9.5));
        assert_eq!(cell.value(), "9.5");
    }

    #[test]
    fn test_numeric_value() {
        let mut cell = Cell::new_empty(CellRef::new(0, 0));
        assert_eq!(cell.numeric_value().unwrap(), 0.0);
        cell.set_raw_content("word");
        assert_eq!(cell.numeric_value().unwrap(), 0.0);
        cell.set_raw_content("-2.5");
        assert_eq!(cell.numeric_value().unwrap(), -2.5);
        cell.set_raw_content("12abc");
        assert!(matches!(
            cell.numeric_value(),
            Err(FormulaError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_grid_positions_are_stable() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.iter().count(), 6);
        for cell in grid.iter() {
            assert_eq!(grid.get(&cell.at()).unwrap().at(), cell.at());
        }
        assert!(grid.get(&CellRef::new(2, 0)).is_none());
        assert!(grid.get(&CellRef::new(0, 3)).is_none());
    }

    #[test]
    fn test_grid_clear() {
        let mut grid = Grid::new(2, 2);
        let a1 = CellRef::new(0, 0);
        grid.get_mut(&a1).unwrap().set_raw_content("5");
        grid.get_mut(&a1).unwrap().push_dependent(CellRef::new(1, 0));
        grid.clear();
        let cell = grid.get(&a1).unwrap();
        assert_eq!(cell.kind(), CellKind::Empty);
        assert!(cell.dependents().is_empty());
    }
}
