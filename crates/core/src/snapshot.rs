use crate::grid::Grid;
use crate::types::{BombKind, PieceType, Pos};

/// Visible contents of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    pub piece_type: PieceType,
    pub bomb: BombKind,
}

/// Plain copy of the board without piece identities
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, `y = 0` first
    pub cells: Vec<Option<CellSnapshot>>,
}

impl BoardSnapshot {
    pub fn from_grid(grid: &Grid) -> Self {
        let cells = grid
            .positions()
            .map(|pos| {
                grid.get(pos).ok().flatten().map(|piece| CellSnapshot {
                    piece_type: piece.piece_type(),
                    bomb: piece.bomb(),
                })
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
        }
    }

    pub fn get(&self, pos: Pos) -> Option<CellSnapshot> {
        if pos.x < 0 || pos.y < 0 || pos.x as u8 >= self.width || pos.y as u8 >= self.height {
            return None;
        }
        self.cells[pos.y as usize * usize::from(self.width) + pos.x as usize]
    }

    /// Types as `rows[y][x]`, the same layout `Grid::from_type_rows` takes
    pub fn as_type_rows(&self) -> Vec<Vec<Option<PieceType>>> {
        self.cells
            .chunks(usize::from(self.width))
            .map(|row| row.iter().map(|cell| cell.map(|c| c.piece_type)).collect())
            .collect()
    }

    /// Write the board as a compact byte grid: 0 = empty, type + 1 otherwise
    pub fn write_u8_grid(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(
            self.cells
                .iter()
                .map(|cell| cell.map_or(0, |c| c.piece_type.saturating_add(1))),
        );
    }
}
