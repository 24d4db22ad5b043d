//! cellsheet_engine - Cell model, dependency graph and formula evaluation.

pub mod builtins;
pub mod engine;

pub use builtins::{COPY_FUNCTION, RANGE_BUILTINS, RangeFunction};
