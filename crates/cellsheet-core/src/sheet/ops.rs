use super::Sheet;
use crate::error::Result;
use cellsheet_engine::engine::{CellKind, CellRef, detect_cycle, evaluate};
use tracing::debug;

impl Sheet {
    /// Store raw text in a cell and propagate the change downstream.
    ///
    /// Returns every cell whose stored content or value was rewritten, the
    /// edited cell first and then the cascade in notification order. Each
    /// cell appears once, at its first rewrite.
    pub fn set_content(&mut self, at: &CellRef, text: &str) -> Result<Vec<CellRef>> {
        let was_formula = self.checked_cell(at)?.kind() == CellKind::Formula;
        if was_formula {
            let removed = self.grid.remove_dependent_everywhere(at);
            debug!(cell = %at, removed, "tore down formula edges");
        }

        if let Some(cell) = self.grid.get_mut(at) {
            cell.set_raw_content(text);
        }

        let mut changed = Vec::new();
        if CellKind::classify(text) == CellKind::Formula {
            self.recompute(at, &mut changed);
        } else {
            push_changed(&mut changed, *at);
        }
        self.notify_dependents(at, &mut changed);
        debug_assert!(detect_cycle(at, &self.grid).is_none());

        self.modified = true;
        Ok(changed)
    }

    /// Blank a cell. Same as storing the empty string.
    pub fn clear_cell(&mut self, at: &CellRef) -> Result<Vec<CellRef>> {
        self.set_content(at, "")
    }

    /// Evaluate the formula stored at `at` from its placeholder value.
    ///
    /// A malformed formula blanks the cell. A well-formed one registers an
    /// edge from every cell it reads (refused edges are skipped) and then
    /// stores its result, or reports why no result could be computed.
    pub(crate) fn recompute(&mut self, at: &CellRef, changed: &mut Vec<CellRef>) {
        let source = match self.grid.get_mut(at) {
            Some(cell) => {
                cell.set_computed_value(0.0);
                cell.content().to_string()
            }
            None => return,
        };

        match evaluate(&source, &self.grid) {
            Ok(evaluation) => {
                for upstream in &evaluation.references {
                    self.grid.add_dependent(upstream, at);
                }
                match evaluation.value {
                    Ok(value) => {
                        if let Some(cell) = self.grid.get_mut(at) {
                            cell.set_computed_value(value);
                        }
                    }
                    Err(err) => self.report(*at, err.to_string()),
                }
            }
            Err(err) => {
                debug!(cell = %at, error = %err, "blanking malformed formula");
                self.grid.remove_dependent_everywhere(at);
                if let Some(cell) = self.grid.get_mut(at) {
                    cell.set_raw_content("");
                }
            }
        }
        push_changed(changed, *at);
    }

    /// Walk the dependents of `at` depth-first in insertion order.
    ///
    /// Formula dependents recompute and notify their own dependents. A
    /// dependent that no longer holds a formula loses its outgoing edges.
    pub(crate) fn notify_dependents(&mut self, at: &CellRef, changed: &mut Vec<CellRef>) {
        let dependents: Vec<CellRef> = match self.grid.get(at) {
            Some(cell) => cell.dependents().iter().copied().collect(),
            None => return,
        };

        for dependent in dependents {
            let kind = self.grid.get(&dependent).map(|cell| cell.kind());
            if kind == Some(CellKind::Formula) {
                self.recompute(&dependent, changed);
                self.notify_dependents(&dependent, changed);
            } else if let Some(cell) = self.grid.get_mut(&dependent) {
                debug!(cell = %dependent, "pruning edges of non-formula dependent");
                cell.clear_dependents();
            }
        }
    }
}

fn push_changed(changed: &mut Vec<CellRef>, at: CellRef) {
    if !changed.contains(&at) {
        changed.push(at);
    }
}
