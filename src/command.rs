//! Line-oriented commands.

use crate::error::{CommandError, Result};
use cellsheet_core::CellRef;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Store raw text in a cell
    Set { at: CellRef, text: String },
    Clear(CellRef),
    /// Print the display value
    Get(CellRef),
    /// Print the raw text
    Content(CellRef),
    /// Print the cells notified when this one changes
    Deps(CellRef),
    /// Render a window anchored at the cell (A1 by default)
    Show(Option<CellRef>),
    /// `<SRC-FUNC(FIRST..LAST)`, passed through verbatim
    Broadcast(String),
    Save(PathBuf),
    Load(PathBuf),
    New(PathBuf),
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  set REF TEXT          store TEXT in REF (=A1+2, @SUM(A1..A3), 42, text)
  clear REF             blank REF
  get REF               print the value of REF
  content REF           print the raw text of REF
  deps REF              list the cells recomputed when REF changes
  show [REF]            render the grid starting at REF
  <SRC-FUNC(A..B)       copy SRC into A..B (FUNC: CPY, SUM, AVER, MAX, MIN, STDDEV)
  &SAVE PATH            save as CSV
  &LOAD PATH            load a CSV file
  &NEW PATH             start an empty sheet saved to PATH
  ~RESET                blank every cell
  help                  show this help
  quit                  exit";

impl Command {
    /// Parse one input line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if line.starts_with('<') {
            return Ok(Some(Command::Broadcast(line.to_string())));
        }

        let (word, rest) = split_word(line);
        let command = match word {
            "set" => {
                let (name, text) = split_word(rest);
                if name.is_empty() {
                    return Err(CommandError::Usage("set REF TEXT"));
                }
                Command::Set {
                    at: parse_ref(name)?,
                    text: text.to_string(),
                }
            }
            "clear" => Command::Clear(single_ref(rest, "clear REF")?),
            "get" => Command::Get(single_ref(rest, "get REF")?),
            "content" => Command::Content(single_ref(rest, "content REF")?),
            "deps" => Command::Deps(single_ref(rest, "deps REF")?),
            "show" if rest.is_empty() => Command::Show(None),
            "show" => Command::Show(Some(single_ref(rest, "show [REF]")?)),
            "&SAVE" => Command::Save(path_arg(rest, "&SAVE PATH")?),
            "&LOAD" => Command::Load(path_arg(rest, "&LOAD PATH")?),
            "&NEW" => Command::New(path_arg(rest, "&NEW PATH")?),
            "~RESET" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

/// Cell names typed at the prompt are case-insensitive.
fn parse_ref(name: &str) -> Result<CellRef> {
    CellRef::parse(&name.to_ascii_uppercase())
        .ok_or_else(|| CommandError::BadReference(name.to_string()))
}

fn single_ref(rest: &str, usage: &'static str) -> Result<CellRef> {
    match split_word(rest) {
        (name, "") if !name.is_empty() => parse_ref(name),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn path_arg(rest: &str, usage: &'static str) -> Result<PathBuf> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(PathBuf::from(rest))
    }
}
