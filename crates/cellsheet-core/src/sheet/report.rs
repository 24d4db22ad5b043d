//! Reporting evaluation failures to whoever drives the sheet.

use cellsheet_engine::engine::CellRef;
use std::fmt;
use tracing::warn;

/// A user-facing message about one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub at: CellRef,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.at, self.message)
    }
}

/// Receives diagnostics produced while recomputing cells.
///
/// The sheet never prints; the front end decides where messages go.
pub trait ReportSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl<F> ReportSink for F
where
    F: FnMut(&Diagnostic),
{
    fn report(&mut self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Default sink: forwards diagnostics to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        warn!(cell = %diagnostic.at, "{}", diagnostic.message);
    }
}
