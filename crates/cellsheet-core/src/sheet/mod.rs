//! Sheet state and recompute propagation (UI-agnostic).

mod broadcast;
mod io;
mod ops;
mod report;
mod state;

pub use broadcast::BroadcastOutcome;
pub use report::{Diagnostic, LogSink, ReportSink};
pub use state::Sheet;
