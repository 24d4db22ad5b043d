//! Reachability over the dependents relation.
//!
//! Before `candidate` becomes a dependent of `upstream`, we must verify the
//! new edge would not close a loop (e.g., A1 feeds B1, B1 feeds C1, and C1
//! now wants to feed A1). The search walks the current edges only and is
//! re-run on every insertion since the graph changes between edits.

use std::collections::HashSet;

use super::{CellRef, Grid};

/// Whether `target` can be reached from `from` by following dependents edges.
/// A cell always reaches itself.
pub fn reaches(grid: &Grid, from: &CellRef, target: &CellRef) -> bool {
    find_path(grid, from, target).is_some()
}

/// Find a dependents path from `from` to `target`, both ends included.
pub fn find_path(grid: &Grid, from: &CellRef, target: &CellRef) -> Option<Vec<CellRef>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();

    if find_path_dfs(grid, from, target, &mut visited, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn find_path_dfs(
    grid: &Grid,
    current: &CellRef,
    target: &CellRef,
    visited: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    path.push(*current);
    if current == target {
        return true;
    }
    if !visited.insert(*current) {
        path.pop();
        return false;
    }

    if let Some(cell) = grid.get(current) {
        for next in cell.dependents() {
            if find_path_dfs(grid, next, target, visited, path) {
                return true;
            }
        }
    }

    path.pop();
    false
}

/// Detect a cycle in the dependents relation reachable from `start`.
/// Returns Some(cycle_path) if one is found, None otherwise.
pub fn detect_cycle(start: &CellRef, grid: &Grid) -> Option<Vec<CellRef>> {
    let mut visiting = HashSet::new();
    let mut done = HashSet::new();
    let mut path = Vec::new();

    if detect_cycle_dfs(start, grid, &mut visiting, &mut done, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn detect_cycle_dfs(
    current: &CellRef,
    grid: &Grid,
    visiting: &mut HashSet<CellRef>,
    done: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    if visiting.contains(current) {
        path.push(*current);
        return true;
    }
    if done.contains(current) {
        return false;
    }

    let Some(cell) = grid.get(current) else {
        return false;
    };

    visiting.insert(*current);
    path.push(*current);

    for next in cell.dependents() {
        if detect_cycle_dfs(next, grid, visiting, done, path) {
            return true;
        }
    }

    path.pop();
    visiting.remove(current);
    done.insert(*current);
    false
}
