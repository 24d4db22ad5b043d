//! cellsheet - a terminal spreadsheet with a reactive cell dependency graph

mod command;
mod config;
mod error;
mod render;
mod session;

use anyhow::{Context, Result};
use cellsheet_core::{Diagnostic, Sheet};
use clap::Parser;
use session::{Flow, Session};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// cellsheet - cells, formulas and range functions that recompute on change
#[derive(Parser)]
#[command(name = "cellsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file to open (created on save if it does not exist)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Number of rows (overrides the config file)
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns (overrides the config file)
    #[arg(long)]
    cols: Option<usize>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run a command and exit (can be repeated)
    #[arg(short = 'e', long = "execute", value_name = "CMD")]
    execute: Vec<String>,

    /// Save the sheet as CSV after running the commands (non-interactive)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.rows, cli.cols)
        .context("Invalid grid size")?;

    let mut sheet = Sheet::with_file(config.grid.rows, config.grid.cols, cli.file.clone())
        .with_context(|| match &cli.file {
            Some(path) => format!("Failed to open {}", path.display()),
            None => "Failed to create sheet".to_string(),
        })?;
    sheet.set_sink(|diagnostic: &Diagnostic| eprintln!("{}", diagnostic));

    let mut session = Session::new(sheet, config.display);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.execute.is_empty() && cli.output.is_none() {
        return run_interactive(&mut session, &mut out);
    }

    for line in &cli.execute {
        let flow = session
            .run_line(line, &mut out)
            .with_context(|| format!("Command failed: {}", line))?;
        if flow == Flow::Quit {
            break;
        }
    }
    if let Some(path) = &cli.output {
        session
            .sheet
            .save_csv(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read commands from stdin until `quit` or end of input.
/// Command errors are printed and the loop continues.
fn run_interactive(session: &mut Session, out: &mut impl Write) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        match session.run_line(&line?, &mut *out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    if session.sheet.modified {
        eprintln!("Warning: unsaved changes discarded");
    }
    Ok(())
}
