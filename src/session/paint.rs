// src/session/paint.rs
//! The cell path traced during a paint drag.

use std::collections::HashSet;

use crate::grid::CellCoord;

/// What a tick did to the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStep {
    Started,
    Unchanged,
    Backtracked,
    Extended,
    Ignored,
}

/// Ordered, duplicate-free, face-adjacent cells. The set mirrors `cells`.
#[derive(Clone, Debug, Default)]
pub struct PaintPath {
    cells: Vec<CellCoord>,
    members: HashSet<CellCoord>,
}

impl PaintPath {
    pub fn cells(&self) -> &[CellCoord] { &self.cells }

    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn contains(&self, cell: CellCoord) -> bool { self.members.contains(&cell) }

    pub fn last(&self) -> Option<CellCoord> { self.cells.last().copied() }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.members.clear();
    }

    /// Feed the currently hovered cell.
    pub fn step(&mut self, cell: CellCoord) -> PathStep {
        let Some(last) = self.last() else {
            self.push(cell);
            return PathStep::Started;
        };
        if cell == last {
            return PathStep::Unchanged;
        }

        let n = self.cells.len();
        if n >= 2 && self.cells[n - 2] == cell {
            if let Some(popped) = self.cells.pop() {
                self.members.remove(&popped);
            }
            return PathStep::Backtracked;
        }

        if last.is_face_adjacent(cell) && !self.members.contains(&cell) {
            self.push(cell);
            return PathStep::Extended;
        }

        PathStep::Ignored
    }

    fn push(&mut self, cell: CellCoord) {
        self.cells.push(cell);
        self.members.insert(cell);
    }
}
