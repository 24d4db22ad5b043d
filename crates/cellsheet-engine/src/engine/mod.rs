//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`CellKind`], [`CellContent`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`Grid::add_dependent`] and friends - Dependency edges with cycle refusal
//! - [`reaches`], [`detect_cycle`] - Reachability over the dependents relation
//! - [`parse_formula`], [`parse_broadcast`] - Formula grammar
//! - [`evaluate`] - Evaluate formula text against a grid
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod parse;

pub use cell::{Cell, CellContent, CellKind, Grid};
pub use cell_ref::CellRef;
pub use cycle::{detect_cycle, find_path, reaches};
pub use error::{FormulaError, Result};
pub use eval::{Evaluation, evaluate, evaluate_formula, evaluate_range};
pub use format::{format_display, format_number};
pub use parse::{
    Arithmetic, Broadcast, BroadcastFunction, CellRange, Formula, Operand, Operator, RangeCall,
    Term, parse_broadcast, parse_formula,
};
