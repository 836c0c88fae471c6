//! Piece module - piece records, the type catalog and the spawning factory
//!
//! A piece is a small `Copy` record: stable id, catalog type, bomb kind and the
//! cell it sits in. The grid is the only place that moves pieces, and it keeps
//! the stored position in sync with the cell on every write.

use crate::rng::SimpleRng;
use crate::types::{
    BombKind, EngineError, EngineResult, PieceId, PieceType, Pos, MIN_PIECE_TYPES,
};

/// A typed piece on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    piece_type: PieceType,
    bomb: BombKind,
    pos: Pos,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn bomb(&self) -> BombKind {
        self.bomb
    }

    pub fn is_bomb(&self) -> bool {
        self.bomb.is_bomb()
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn x(&self) -> i8 {
        self.pos.x
    }

    pub fn y(&self) -> i8 {
        self.pos.y
    }

    /// Set the bomb kind, replacing any previous one
    pub fn promote_to_bomb(&mut self, kind: BombKind) {
        self.bomb = kind;
    }

    /// Only the grid calls this, right after writing the piece into a cell
    pub(crate) fn place_at(&mut self, pos: Pos) {
        self.pos = pos;
    }
}

/// Fixed set of piece types, indexed `0..size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCatalog {
    size: u8,
}

impl PieceCatalog {
    /// Any non-empty catalog can refill a board
    pub fn new(size: u8) -> EngineResult<Self> {
        if size == 0 {
            return Err(EngineError::InsufficientPieceTypes { have: 0, need: 1 });
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn contains(&self, piece_type: PieceType) -> bool {
        piece_type < self.size
    }

    /// Setup needs enough types to dodge every ready-made run
    pub fn ensure_setup_capable(&self) -> EngineResult<()> {
        if self.size < MIN_PIECE_TYPES {
            return Err(EngineError::InsufficientPieceTypes {
                have: self.size,
                need: MIN_PIECE_TYPES,
            });
        }
        Ok(())
    }
}

/// Creates pieces with fresh ids
#[derive(Debug, Clone)]
pub struct PieceFactory {
    catalog: PieceCatalog,
    next_id: u32,
}

impl PieceFactory {
    pub fn new(catalog: PieceCatalog) -> Self {
        Self {
            catalog,
            next_id: 0,
        }
    }

    /// Factory whose ids continue after `last`
    pub fn resume_after(catalog: PieceCatalog, last: Option<PieceId>) -> Self {
        Self {
            catalog,
            next_id: last.map_or(0, |id| id.get().wrapping_add(1)),
        }
    }

    pub fn catalog(&self) -> PieceCatalog {
        self.catalog
    }

    /// Create a plain piece of `piece_type` addressed to `pos`
    pub fn spawn(&mut self, piece_type: PieceType, pos: Pos) -> EngineResult<Piece> {
        if !self.catalog.contains(piece_type) {
            return Err(EngineError::UnknownPieceType {
                piece_type,
                catalog_size: self.catalog.size(),
            });
        }
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Ok(Piece {
            id,
            piece_type,
            bomb: BombKind::None,
            pos,
        })
    }

    /// Create a plain piece of a uniformly random type
    pub fn spawn_random(&mut self, rng: &mut SimpleRng, pos: Pos) -> Piece {
        let piece_type = rng.next_type(self.catalog.size());
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Piece {
            id,
            piece_type,
            bomb: BombKind::None,
            pos,
        }
    }
}
