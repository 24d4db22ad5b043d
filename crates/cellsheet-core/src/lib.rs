//! cellsheet-core - UI-agnostic sheet model, propagation and storage.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{Result, SheetError};
pub use sheet::{BroadcastOutcome, Diagnostic, LogSink, ReportSink, Sheet};

pub use cellsheet_engine::engine::{CellKind, CellRef};
