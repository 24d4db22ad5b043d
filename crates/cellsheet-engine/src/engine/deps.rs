//! Dependency edges between cells.
//!
//! Edges live on the upstream cell: `upstream.dependents` lists every cell
//! whose formula reads `upstream`. Insertion refuses self edges, duplicates
//! and anything that would close a cycle, so the relation stays acyclic.

use tracing::debug;

use super::cycle::find_path;
use super::{CellRef, Grid};

impl Grid {
    /// Register `candidate` as a dependent of `upstream`.
    ///
    /// Silently refused when `candidate` is `upstream`, is already present,
    /// or already reaches `upstream` through its own dependents. Returns
    /// whether the edge was inserted.
    pub fn add_dependent(&mut self, upstream: &CellRef, candidate: &CellRef) -> bool {
        if upstream == candidate || !self.contains(candidate) {
            return false;
        }
        match self.get(upstream) {
            Some(cell) if cell.has_dependent(candidate) => return false,
            Some(_) => {}
            None => return false,
        }
        if let Some(path) = find_path(self, candidate, upstream) {
            let path: Vec<String> = path.iter().map(|c| c.to_string()).collect();
            debug!(%upstream, %candidate, path = %path.join(" -> "), "refusing dependency edge that would close a cycle");
            return false;
        }
        self.get_mut(upstream)
            .is_some_and(|cell| cell.push_dependent(*candidate))
    }

    /// Remove `target` from the dependents of `upstream`. No error if absent.
    pub fn remove_dependent(&mut self, upstream: &CellRef, target: &CellRef) -> bool {
        self.get_mut(upstream)
            .is_some_and(|cell| cell.remove_dependent(target))
    }

    /// Remove `target` from the dependents of every cell in the grid.
    /// Returns how many edges were dropped.
    pub fn remove_dependent_everywhere(&mut self, target: &CellRef) -> usize {
        let removed = self
            .iter_mut()
            .map(|cell| cell.remove_dependent(target))
            .filter(|removed| *removed)
            .count();
        if removed > 0 {
            debug!(%target, removed, "tore down dependency edges");
        }
        removed
    }

    /// Total number of dependency edges in the grid.
    pub fn edge_count(&self) -> usize {
        self.iter().map(|cell| cell.dependents().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::detect_cycle;

    fn refs() -> (CellRef, CellRef, CellRef) {
        (CellRef::new(0, 0), CellRef::new(1, 0), CellRef::new(2, 0))
    }

    #[test]
    fn test_add_dependent_in_insertion_order() {
        let mut grid = Grid::new(3, 3);
        let (a1, b1, c1) = refs();
        assert!(grid.add_dependent(&a1, &c1));
        assert!(grid.add_dependent(&a1, &b1));
        let order: Vec<CellRef> = grid.get(&a1).unwrap().dependents().iter().copied().collect();
        assert_eq!(order, vec![c1, b1]);
    }

    #[test]
    fn test_add_dependent_refuses_duplicates_and_self() {
        let mut grid = Grid::new(3, 3);
        let (a1, b1, _) = refs();
        assert!(grid.add_dependent(&a1, &b1));
        assert!(!grid.add_dependent(&a1, &b1));
        assert!(!grid.add_dependent(&a1, &a1));
        assert_eq!(grid.edge_count(), 1);
    }

    #[test]
    fn test_add_dependent_refuses_cycles() {
        let mut grid = Grid::new(3, 3);
        let (a1, b1, c1) = refs();
        assert!(grid.add_dependent(&a1, &b1));
        assert!(grid.add_dependent(&b1, &c1));
        // C1 -> A1 would close A1 -> B1 -> C1 -> A1
        assert!(!grid.add_dependent(&c1, &a1));
        assert!(!grid.add_dependent(&b1, &a1));
        assert!(detect_cycle(&a1, &grid).is_none());
    }

    #[test]
    fn test_add_dependent_outside_grid() {
        let mut grid = Grid::new(1, 1);
        let (a1, b1, _) = refs();
        assert!(!grid.add_dependent(&a1, &b1));
        assert!(!grid.add_dependent(&b1, &a1));
    }

    #[test]
    fn test_remove_dependent() {
        let mut grid = Grid::new(3, 3);
        let (a1, b1, c1) = refs();
        grid.add_dependent(&a1, &b1);
        assert!(grid.remove_dependent(&a1, &b1));
        assert!(!grid.remove_dependent(&a1, &b1));
        assert!(!grid.remove_dependent(&a1, &c1));
    }

    #[test]
    fn test_remove_dependent_everywhere() {
        let mut grid = Grid::new(3, 3);
        let (a1, b1, c1) = refs();
        grid.add_dependent(&a1, &c1);
        grid.add_dependent(&b1, &c1);
        grid.add_dependent(&a1, &b1);

        assert_eq!(grid.remove_dependent_everywhere(&c1), 2);
        assert_eq!(grid.edge_count(), 1);
        assert!(grid.get(&a1).unwrap().has_dependent(&b1));
    }
}
