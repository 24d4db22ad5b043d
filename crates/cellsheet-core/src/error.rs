//! Error types for Cellsheet core.

use thiserror::Error;

use cellsheet_engine::engine::{CellRef, FormulaError};

/// Errors that can occur while editing or persisting a sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Cell {0} is outside the grid")]
    OutOfBounds(CellRef),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, SheetError>;
