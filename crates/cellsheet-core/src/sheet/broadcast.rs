use super::Sheet;
use crate::error::Result;
use cellsheet_engine::engine::{BroadcastFunction, CellRef, evaluate_range, parse_broadcast};
use tracing::debug;

/// What a `<SRC-FUNC(FIRST..LAST)` command did.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastOutcome {
    pub source: CellRef,
    /// The range cells that received the source content, in range order.
    pub targets: Vec<CellRef>,
    /// The aggregate over the range before the copy; `None` for `CPY`.
    pub aggregate: Option<f64>,
    /// Every cell rewritten by the copy and its cascades.
    pub changed: Vec<CellRef>,
}

impl Sheet {
    /// Copy the source cell into every cell of a range.
    ///
    /// For an aggregate function the range is first aggregated and the
    /// result returned. A malformed command fails without touching the sheet.
    /// After the copy each target is registered as a dependent of the
    /// source, so later edits to the source notify the targets.
    pub fn broadcast(&mut self, command: &str) -> Result<BroadcastOutcome> {
        let parsed = parse_broadcast(command, self.rows(), self.cols())?;
        let source = parsed.source;
        let targets = parsed.range.cells();

        let aggregate = match parsed.function {
            BroadcastFunction::Copy => None,
            BroadcastFunction::Aggregate(function) => {
                match evaluate_range(function, &parsed.range, &self.grid) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        self.report(source, err.to_string());
                        None
                    }
                }
            }
        };

        let (content, kind) = {
            let cell = self.checked_cell(&source)?;
            (cell.content().to_string(), cell.kind())
        };
        let value = self
            .checked_cell(&source)?
            .numeric_value()
            .ok()
            .filter(|_| kind.is_numeric());

        let mut changed = Vec::new();
        for target in &targets {
            for at in self.set_content(target, &content)? {
                if !changed.contains(&at) {
                    changed.push(at);
                }
            }
            if let (Some(value), Some(cell)) = (value, self.grid.get_mut(target)) {
                cell.set_computed_value(value);
            }
        }

        let linked = targets
            .iter()
            .filter(|target| self.grid.add_dependent(&source, target))
            .count();
        debug!(%source, targets = targets.len(), linked, "broadcast source");

        Ok(BroadcastOutcome {
            source,
            targets,
            aggregate,
            changed,
        })
    }
}
