//! Range-call notation in interchange files.
//!
//! Cells store `@AVER(A1..A3)`; CSV files carry the spreadsheet spelling
//! `=AVERAGE(A1:A3)`. Anything that is not a whole range call passes through.

use cellsheet_engine::RangeFunction;
use regex::Regex;
use std::sync::OnceLock;

fn internal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^@(?<name>[A-Z]+)\((?<first>[A-Z]{1,2}[0-9]+)\.\.(?<last>[A-Z]{1,2}[0-9]+)\)$")
            .expect("internal range call regex must compile")
    })
}

fn interchange_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^=(?<name>[A-Za-z]+)\((?<first>[A-Z]{1,2}[0-9]+):(?<last>[A-Z]{1,2}[0-9]+)\)$")
            .expect("interchange range call regex must compile")
    })
}

/// Rewrite `@FUNC(A..B)` cell text as `=INTERCHANGE(A:B)`.
pub fn to_interchange(raw: &str) -> String {
    internal_re()
        .captures(raw)
        .and_then(|caps| {
            let function = RangeFunction::from_name(&caps["name"])?;
            Some(format!(
                "={}({}:{})",
                function.interchange_name(),
                &caps["first"],
                &caps["last"]
            ))
        })
        .unwrap_or_else(|| raw.to_string())
}

/// Rewrite `=INTERCHANGE(A:B)` from a file back to `@FUNC(A..B)`.
pub fn to_internal(field: &str) -> String {
    interchange_re()
        .captures(field)
        .and_then(|caps| {
            let function = RangeFunction::from_interchange_name(&caps["name"])?;
            Some(format!(
                "@{}({}..{})",
                function.name(),
                &caps["first"],
                &caps["last"]
            ))
        })
        .unwrap_or_else(|| field.to_string())
}
