//! File storage: CSV records and the interchange spelling of range calls.

pub mod csv;
pub mod notation;

pub use csv::{read_csv, write_csv};
pub use notation::{to_interchange, to_internal};
