//! Formula errors.

use thiserror::Error;

/// Errors produced while parsing or evaluating a formula.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Malformed formula: {0}")]
    Syntax(String),

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("Reference {0} is outside the grid")]
    OutOfBounds(String),

    #[error("Lowercase letters are not allowed in formulas")]
    Lowercase,

    #[error("Cannot read '{text}' as a number")]
    NotANumber { text: String },
}

impl FormulaError {
    /// Malformed formulas blank their cell; anything else is reported to the user.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, FormulaError::NotANumber { .. })
    }
}

pub type Result<T> = std::result::Result<T, FormulaError>;
