//! Command execution against a sheet.

use crate::command::{Command, HELP};
use crate::config::DisplayConfig;
use crate::error::Result;
use crate::render::render_window;
use cellsheet_core::{CellRef, Sheet};
use cellsheet_engine::RANGE_BUILTINS;
use cellsheet_engine::engine::format_number;
use std::io::Write;
use tracing::info;

/// Whether the command loop should keep reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    pub sheet: Sheet,
    pub display: DisplayConfig,
}

impl Session {
    pub fn new(sheet: Sheet, display: DisplayConfig) -> Self {
        Session { sheet, display }
    }

    /// Parse and run one input line, writing any output to `out`.
    pub fn run_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        match Command::parse(line)? {
            Some(command) => self.execute(command, out),
            None => Ok(Flow::Continue),
        }
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Set { at, text } => {
                let changed = self.sheet.set_content(&at, &text)?;
                info!(cell = %at, changed = changed.len(), "cell updated");
            }
            Command::Clear(at) => {
                self.sheet.clear_cell(&at)?;
            }
            Command::Get(at) => writeln!(out, "{}", self.sheet.value(&at)?)?,
            Command::Content(at) => writeln!(out, "{}", self.sheet.content(&at)?)?,
            Command::Deps(at) => {
                let names: Vec<String> = self
                    .sheet
                    .dependents_of(&at)?
                    .iter()
                    .map(|d| d.to_string())
                    .collect();
                writeln!(out, "{}", names.join(" "))?;
            }
            Command::Show(anchor) => {
                let anchor = anchor.unwrap_or(CellRef::new(0, 0));
                write!(out, "{}", render_window(&self.sheet, anchor, &self.display))?;
            }
            Command::Broadcast(text) => {
                let outcome = self.sheet.broadcast(&text)?;
                if let Some(value) = outcome.aggregate {
                    writeln!(out, "{}", format_number(value))?;
                }
            }
            Command::Save(path) => {
                self.sheet.save_csv(&path)?;
                writeln!(out, "Saved {}", path.display())?;
            }
            Command::Load(path) => {
                let count = self.sheet.load_csv(&path)?;
                writeln!(out, "Loaded {} cells from {}", count, path.display())?;
            }
            Command::New(path) => {
                self.sheet.new_file(path.clone())?;
                writeln!(out, "Created {}", path.display())?;
            }
            Command::Reset => self.sheet.reset(),
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                writeln!(out, "Range functions:")?;
                for builtin in RANGE_BUILTINS {
                    writeln!(out, "  {:<8} {}", builtin.sheet_name, builtin.description)?;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(Sheet::new(10, 10), DisplayConfig::default())
    }

    fn run(session: &mut Session, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            session.run_line(line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_set_and_get_propagate() {
        let mut s = session();
        let out = run(
            &mut s,
            &["set A1 5", "set B1 =A1+3", "get B1", "set A1 10", "get B1"],
        );
        assert_eq!(out, "8\n13\n");
    }

    #[test]
    fn test_content_and_deps() {
        let mut s = session();
        let out = run(
            &mut s,
            &["set A1 2", "set B1 @SUM(A1..A3)", "set C1 =A1*2", "content B1", "deps A1"],
        );
        assert_eq!(out, "@SUM(A1..A3)\nB1 C1\n");
    }

    #[test]
    fn test_broadcast_prints_aggregate() {
        let mut s = session();
        let out = run(
            &mut s,
            &["set A1 1", "set A2 2", "set A3 text", "set C1 x", "<C1-AVER(A1..A3)", "get A3"],
        );
        assert_eq!(out, "1.5\nx\n");
    }

    #[test]
    fn test_quit_and_errors() {
        let mut s = session();
        let mut out = Vec::new();
        assert_eq!(s.run_line("quit", &mut out).unwrap(), Flow::Quit);
        assert!(s.run_line("set Z99 1", &mut out).is_err());
        assert!(s.run_line("<A1-NOPE(B1..B2)", &mut out).is_err());
    }

    #[test]
    fn test_help_lists_range_functions() {
        let mut s = session();
        let out = run(&mut s, &["help"]);
        assert!(out.contains("Range functions:"));
        assert!(out.contains("  STDDEV   Population standard deviation of numeric values in a range\n"));
        assert!(out.contains("  AVER     Mean of numeric values in a range\n"));
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        let out = run(&mut s, &["set A1 5", "~RESET", "content A1"]);
        assert_eq!(out, "\n");
    }
}
