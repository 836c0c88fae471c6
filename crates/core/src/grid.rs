//! Grid module - the board's cells
//!
//! The grid is a `width x height` field where each cell is empty or holds one
//! piece. Storage is a flat row-major vector (`y * width + x`), with `y = 0`
//! the bottom row.
//!
//! All access is bounds-checked and fails with `OutOfBounds` rather than
//! clamping. Writing a piece into a cell updates the piece's stored position,
//! so `grid.get(piece.pos()) == Some(piece)` holds for every live piece.

use std::collections::HashSet;

use crate::piece::{Piece, PieceFactory};
use crate::types::{
    BombKind, EngineError, EngineResult, PieceId, PieceType, Pos, MAX_DIMENSION,
};

/// A cell on the board: empty or one piece
pub type Cell = Option<Piece>;

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> EngineResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; usize::from(width) * usize::from(height)],
        })
    }

    /// Build a fully populated grid from piece types.
    ///
    /// `rows[y][x]` is the type at `(x, y)`, so the first row is the bottom of
    /// the board. All rows must have the same length.
    pub fn from_type_rows<R: AsRef<[PieceType]>>(
        rows: &[R],
        factory: &mut PieceFactory,
    ) -> EngineResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width > usize::from(MAX_DIMENSION) || height > usize::from(MAX_DIMENSION) {
            return Err(EngineError::InvalidDimensions {
                width: width.min(usize::from(u8::MAX)) as u8,
                height: height.min(usize::from(u8::MAX)) as u8,
            });
        }
        let mut grid = Self::new(width as u8, height as u8)?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(EngineError::InvalidDimensions {
                    width: row.len().min(usize::from(u8::MAX)) as u8,
                    height: height as u8,
                });
            }
            for (x, &piece_type) in row.iter().enumerate() {
                let pos = Pos::new(x as i8, y as i8);
                let piece = factory.spawn(piece_type, pos)?;
                grid.set(pos, Some(piece))?;
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if self.is_in_bounds(pos) {
            Some(pos.y as usize * usize::from(self.width) + pos.x as usize)
        } else {
            None
        }
    }

    fn checked_index(&self, pos: Pos) -> EngineResult<usize> {
        self.index(pos).ok_or(EngineError::OutOfBounds {
            x: i32::from(pos.x),
            y: i32::from(pos.y),
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u8) < self.width && (pos.y as u8) < self.height
    }

    /// Validate raw coordinates coming from outside the engine
    pub fn pos_checked(&self, x: i32, y: i32) -> EngineResult<Pos> {
        let out = EngineError::OutOfBounds { x, y };
        let pos = match (i8::try_from(x), i8::try_from(y)) {
            (Ok(x), Ok(y)) => Pos::new(x, y),
            _ => return Err(out),
        };
        if self.is_in_bounds(pos) {
            Ok(pos)
        } else {
            Err(out)
        }
    }

    /// Piece at `pos`, `Ok(None)` for an empty cell
    pub fn get(&self, pos: Pos) -> EngineResult<Option<Piece>> {
        let idx = self.checked_index(pos)?;
        Ok(self.cells[idx])
    }

    /// Type of the piece at `pos`; `None` for empty or out-of-bounds cells
    #[inline]
    pub fn type_at(&self, pos: Pos) -> Option<PieceType> {
        self.index(pos)
            .and_then(|idx| self.cells[idx])
            .map(|piece| piece.piece_type())
    }

    /// Replace the cell contents, returning what was there.
    ///
    /// A placed piece has its stored position updated to `pos`.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> EngineResult<Cell> {
        let idx = self.checked_index(pos)?;
        let cell = cell.map(|mut piece| {
            piece.place_at(pos);
            piece
        });
        Ok(std::mem::replace(&mut self.cells[idx], cell))
    }

    /// Empty the cell, returning its piece
    pub fn take(&mut self, pos: Pos) -> EngineResult<Cell> {
        self.set(pos, None)
    }

    /// Exchange two cells, updating both pieces' positions
    pub fn swap(&mut self, a: Pos, b: Pos) -> EngineResult<()> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        if let Some(piece) = self.cells[ia].as_mut() {
            piece.place_at(a);
        }
        if let Some(piece) = self.cells[ib].as_mut() {
            piece.place_at(b);
        }
        Ok(())
    }

    /// Set the bomb kind of the piece at `pos`
    pub fn promote(&mut self, pos: Pos, kind: BombKind) -> EngineResult<Piece> {
        let idx = self.checked_index(pos)?;
        match self.cells[idx].as_mut() {
            Some(piece) => {
                piece.promote_to_bomb(kind);
                Ok(*piece)
            }
            None => Err(EngineError::EmptyCell { x: pos.x, y: pos.y }),
        }
    }

    /// Every cell position, row by row from the bottom, left to right
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let width = self.width as i8;
        let height = self.height as i8;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos::new(x, y)))
    }

    /// Live pieces in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    /// Live pieces in row `y`, left to right
    pub fn row(&self, y: i8) -> impl Iterator<Item = &Piece> {
        let width = usize::from(self.width);
        let range = if y >= 0 && (y as u8) < self.height {
            let start = y as usize * width;
            start..start + width
        } else {
            0..0
        };
        self.cells[range].iter().flatten()
    }

    /// Live pieces in column `x`, bottom to top
    pub fn column(&self, x: i8) -> impl Iterator<Item = &Piece> {
        let width = usize::from(self.width);
        let valid = x >= 0 && (x as u8) < self.width;
        self.cells
            .iter()
            .skip(if valid { x as usize } else { self.cells.len() })
            .step_by(width)
            .flatten()
    }

    /// Number of live pieces
    pub fn count(&self) -> usize {
        self.pieces().count()
    }

    /// Highest piece id on the board
    pub fn max_id(&self) -> Option<PieceId> {
        self.pieces().map(Piece::id).max()
    }

    /// Check that every piece sits where it thinks it does and no id appears twice
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.cells.len());
        self.positions().all(|pos| match self.get(pos) {
            Ok(Some(piece)) => piece.pos() == pos && seen.insert(piece.id()),
            Ok(None) => true,
            Err(_) => false,
        })
    }
}
