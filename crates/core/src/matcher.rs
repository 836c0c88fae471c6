//! Match scanner - finds runs of three or more identical pieces
//!
//! Rows are scanned bottom to top, each left to right; then columns left to
//! right, each bottom to top. A run is opened when three consecutive cells
//! share a type, extended while the next cell matches, and scanning resumes
//! right after its far edge, so runs never overlap within one axis pass.
//!
//! A cell can belong to a horizontal and a vertical group at the same time.
//! The scanner reports both; callers flatten with [`matched_positions`].

use std::collections::HashSet;

use crate::grid::Grid;
use crate::types::{Axis, PieceType, Pos, MIN_RUN};

/// A run of at least three same-type pieces along one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    axis: Axis,
    piece_type: PieceType,
    /// In scan order: left to right, or bottom to top
    cells: Vec<Pos>,
}

impl MatchGroup {
    pub(crate) fn new(axis: Axis, piece_type: PieceType, cells: Vec<Pos>) -> Self {
        debug_assert!(cells.len() >= MIN_RUN);
        Self {
            axis,
            piece_type,
            cells,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell of the run in scan order; hosts a spawned bomb
    pub fn anchor(&self) -> Pos {
        self.cells[0]
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }
}

/// Scan the whole grid for runs
pub fn find_matches(grid: &Grid) -> Vec<MatchGroup> {
    let width = grid.width() as i8;
    let height = grid.height() as i8;
    let mut groups = Vec::new();

    for y in 0..height {
        scan_line(grid, Axis::Horizontal, width, |i| Pos::new(i, y), &mut groups);
    }
    for x in 0..width {
        scan_line(grid, Axis::Vertical, height, |i| Pos::new(x, i), &mut groups);
    }

    groups
}

fn scan_line<F>(grid: &Grid, axis: Axis, len: i8, at: F, out: &mut Vec<MatchGroup>)
where
    F: Fn(i8) -> Pos,
{
    let run = MIN_RUN as i8;
    let mut i = 0;
    while i + run <= len {
        let Some(piece_type) = grid.type_at(at(i)) else {
            i += 1;
            continue;
        };
        if (1..run).any(|k| grid.type_at(at(i + k)) != Some(piece_type)) {
            i += 1;
            continue;
        }

        let mut end = i + run;
        while end < len && grid.type_at(at(end)) == Some(piece_type) {
            end += 1;
        }
        out.push(MatchGroup::new(axis, piece_type, (i..end).map(&at).collect()));
        i = end;
    }
}

/// True if any run exists; stops at the first one
pub fn has_match(grid: &Grid) -> bool {
    let triple = |a: Pos, b: Pos, c: Pos| match grid.type_at(a) {
        Some(t) => grid.type_at(b) == Some(t) && grid.type_at(c) == Some(t),
        None => false,
    };
    grid.positions().any(|pos| {
        let (x, y) = (pos.x, pos.y);
        triple(pos, Pos::new(x + 1, y), Pos::new(x + 2, y))
            || triple(pos, Pos::new(x, y + 1), Pos::new(x, y + 2))
    })
}

/// Flatten groups to unique positions, keeping first-seen order
pub fn matched_positions(groups: &[MatchGroup]) -> Vec<Pos> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|group| group.cells().iter().copied())
        .filter(|pos| seen.insert(*pos))
        .collect()
}
