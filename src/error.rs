//! Error types for the cellsheet command line

use cellsheet_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running a command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid cell reference: {0}")]
    BadReference(String),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
