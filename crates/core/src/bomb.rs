//! Bomb resolver - blast sets and bomb-spawn decisions
//!
//! Two questions live here:
//!
//! - which cells a bomb clears when it fires ([`pieces_affected_by_bomb`],
//!   [`resolve_swap_blast`])
//! - whether a cleared run leaves a bomb behind ([`classify_run_for_bomb_spawn`])

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::matcher::MatchGroup;
use crate::piece::Piece;
use crate::types::{
    BombKind, EngineError, EngineResult, PieceType, Pos, COLOR_BOMB_RUN, LINE_BOMB_RUN,
};

/// What clearing a run leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombSpawnDecision {
    /// Run of three: every cell is cleared
    Plain,
    /// The anchor survives and becomes a bomb of `kind`
    Spawn { anchor: Pos, kind: BombKind },
}

/// Run length 3 clears plainly, 4 leaves a line bomb along the run, 5+ a color bomb
pub fn classify_run_for_bomb_spawn(group: &MatchGroup) -> BombSpawnDecision {
    let kind = match group.len() {
        n if n >= COLOR_BOMB_RUN => BombKind::ColorClear,
        n if n == LINE_BOMB_RUN => BombKind::line_for(group.axis()),
        _ => return BombSpawnDecision::Plain,
    };
    BombSpawnDecision::Spawn {
        anchor: group.anchor(),
        kind,
    }
}

/// Cells cleared when `bomb` fires, the bomb's own cell first.
///
/// `ColorClear` needs `color_target` and fails with `MissingColorTarget`
/// without it. A piece with no bomb kind only clears itself.
pub fn pieces_affected_by_bomb(
    grid: &Grid,
    bomb: &Piece,
    color_target: Option<PieceType>,
) -> EngineResult<Vec<Pos>> {
    let origin = bomb.pos();
    let mut cells = vec![origin];
    let others = |piece: &&Piece| piece.pos() != origin;

    match bomb.bomb() {
        BombKind::None => {}
        BombKind::RowClear => {
            cells.extend(grid.row(origin.y).filter(others).map(Piece::pos));
        }
        BombKind::ColumnClear => {
            cells.extend(grid.column(origin.x).filter(others).map(Piece::pos));
        }
        BombKind::ColorClear => {
            let target = color_target.ok_or(EngineError::MissingColorTarget)?;
            cells.extend(
                grid.pieces()
                    .filter(others)
                    .filter(|piece| piece.piece_type() == target)
                    .map(Piece::pos),
            );
        }
    }

    Ok(cells)
}

/// One bomb going off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detonation {
    pub pos: Pos,
    pub kind: BombKind,
    /// Swept type for `ColorClear`
    pub target: Option<PieceType>,
}

/// Combined effect of a bomb swap
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blast {
    pub detonations: ArrayVec<Detonation, 2>,
    /// Deduplicated, in first-seen order
    pub cells: Vec<Pos>,
}

impl Blast {
    pub fn detonated_at(&self, pos: Pos) -> bool {
        self.detonations.iter().any(|d| d.pos == pos)
    }
}

/// Blast set for two just-swapped pieces, at their new positions.
///
/// Every side carrying a bomb fires and the sets are unioned. A color bomb
/// sweeps the type of the piece it was swapped with, so two color bombs sweep
/// each other's type.
pub fn resolve_swap_blast(grid: &Grid, first: &Piece, second: &Piece) -> EngineResult<Blast> {
    let mut blast = Blast::default();
    let mut seen = HashSet::new();

    for (bomb, other) in [(first, second), (second, first)] {
        if !bomb.is_bomb() {
            continue;
        }
        let target = match bomb.bomb() {
            BombKind::ColorClear => Some(other.piece_type()),
            _ => None,
        };
        let cells = pieces_affected_by_bomb(grid, bomb, target)?;
        blast.cells.extend(cells.into_iter().filter(|pos| seen.insert(*pos)));
        blast.detonations.push(Detonation {
            pos: bomb.pos(),
            kind: bomb.bomb(),
            target,
        });
    }

    Ok(blast)
}
