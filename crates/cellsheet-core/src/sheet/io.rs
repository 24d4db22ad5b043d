use super::Sheet;
use crate::error::{Result, SheetError};
use crate::storage::{read_csv, to_interchange, to_internal, write_csv};
use cellsheet_engine::engine::{CellKind, CellRef};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

impl Sheet {
    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(SheetError::NoFilePath);
        };
        self.save_csv(&path)?;
        Ok(path)
    }

    /// Write raw cell text as CSV, covering A1 through the last non-empty
    /// row and column. Range calls use the interchange spelling.
    pub fn save_csv(&mut self, path: &Path) -> Result<()> {
        let mut last_row = None;
        let mut last_col = None;
        for cell in self.grid.iter().filter(|c| c.kind() != CellKind::Empty) {
            let at = cell.at();
            last_row = last_row.max(Some(at.row));
            last_col = last_col.max(Some(at.col));
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        if let (Some(last_row), Some(last_col)) = (last_row, last_col) {
            for row in 0..=last_row {
                let fields: Vec<String> = (0..=last_col)
                    .map(|col| {
                        self.grid
                            .get(&CellRef::new(col, row))
                            .map(|cell| to_interchange(cell.content()))
                            .unwrap_or_default()
                    })
                    .collect();
                rows.push(fields);
            }
        }

        write_csv(path, &rows)?;
        debug!(path = %path.display(), rows = rows.len(), "saved sheet");
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Replace the sheet with the contents of a CSV file.
    ///
    /// Fields are entered in row-major order through [`Sheet::set_content`],
    /// so formulas see every cell stored before them. Fields outside the
    /// grid are skipped. Returns how many cells were filled.
    pub fn load_csv(&mut self, path: &Path) -> Result<usize> {
        let records = read_csv(path)?;
        self.reset();

        let mut count = 0;
        let mut skipped = 0;
        for (row, fields) in records.iter().enumerate() {
            for (col, field) in fields.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let at = CellRef::new(col, row);
                if !self.grid.contains(&at) {
                    skipped += 1;
                    continue;
                }
                self.set_content(&at, &to_internal(field))?;
                count += 1;
            }
        }
        if skipped > 0 {
            warn!(path = %path.display(), skipped, "fields outside the grid were not loaded");
        }

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(count)
    }

    /// Start over with an empty sheet and write it to `path`.
    pub fn new_file(&mut self, path: PathBuf) -> Result<()> {
        self.reset();
        self.save_csv(&path)
    }
}
