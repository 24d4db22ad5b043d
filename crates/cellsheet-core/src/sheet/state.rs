use super::report::{Diagnostic, LogSink, ReportSink};
use crate::error::{Result, SheetError};
use cellsheet_engine::engine::{Cell, CellKind, CellRef, Grid};
use std::path::PathBuf;

/// UI-agnostic sheet state: the grid, where diagnostics go, and the backing file.
pub struct Sheet {
    /// The fixed-size cell grid. Edges live on the upstream cells.
    pub(crate) grid: Grid,
    /// Receives numeric evaluation failures
    pub(crate) sink: Box<dyn ReportSink>,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since the last load or save
    pub modified: bool,
}

impl Sheet {
    /// Create an empty `rows x cols` sheet that reports through [`LogSink`].
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new(rows: usize, cols: usize) -> Self {
        Sheet {
            grid: Grid::new(rows, cols),
            sink: Box::new(LogSink),
            file_path: None,
            modified: false,
        }
    }

    /// Create a sheet and load a file if provided.
    ///
    /// A path that does not exist yet becomes the save target.
    pub fn with_file(rows: usize, cols: usize, path: Option<PathBuf>) -> Result<Self> {
        let mut sheet = Self::new(rows, cols);
        if let Some(p) = path {
            if p.exists() {
                sheet.load_csv(&p)?;
            } else {
                sheet.file_path = Some(p);
            }
        }
        Ok(sheet)
    }

    /// Replace the diagnostic sink.
    pub fn set_sink(&mut self, sink: impl ReportSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub(crate) fn report(&mut self, at: CellRef, message: String) {
        let diagnostic = Diagnostic { at, message };
        self.sink.report(&diagnostic);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn cell(&self, at: &CellRef) -> Option<&Cell> {
        self.grid.get(at)
    }

    pub(crate) fn checked_cell(&self, at: &CellRef) -> Result<&Cell> {
        self.grid.get(at).ok_or(SheetError::OutOfBounds(*at))
    }

    /// The display value of a cell (formulas show their computed number).
    pub fn value(&self, at: &CellRef) -> Result<String> {
        Ok(self.checked_cell(at)?.value())
    }

    /// The raw text last stored in a cell.
    pub fn content(&self, at: &CellRef) -> Result<&str> {
        Ok(self.checked_cell(at)?.content())
    }

    pub fn kind(&self, at: &CellRef) -> Result<CellKind> {
        Ok(self.checked_cell(at)?.kind())
    }

    /// Cells recomputed when `at` changes, in the order they are notified.
    pub fn dependents_of(&self, at: &CellRef) -> Result<Vec<CellRef>> {
        Ok(self.checked_cell(at)?.dependents().iter().copied().collect())
    }

    /// Blank every cell and drop every edge. The file path is kept.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.modified = true;
    }
}
