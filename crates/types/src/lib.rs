//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types shared by the board engine, the
//! input side and the presentation adapter. Everything here is plain data with
//! no behavior beyond small helpers, so any layer can depend on it.
//!
//! # Coordinates
//!
//! Cells are addressed by `(x, y)` with `x` growing to the right and `y`
//! growing upward: `y = 0` is the bottom row, which is where pieces settle
//! when the board collapses.
//!
//! # Board Limits
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//! | `LINE_BOMB_RUN` | 4 | Run length that spawns a line-clear bomb |
//! | `COLOR_BOMB_RUN` | 5 | Run length that spawns a color-clear bomb |
//! | `MIN_PIECE_TYPES` | 3 | Smallest catalog setup accepts |
//! | `MAX_DIMENSION` | 64 | Largest width or height accepted |
//!
//! # Examples
//!
//! ```
//! use gemfall_types::{Axis, BombKind, Pos};
//!
//! let a = Pos::new(2, 0);
//! let b = Pos::new(3, 0);
//! assert!(a.is_adjacent(b));
//! assert!(!a.is_adjacent(Pos::new(3, 1)));
//!
//! assert_eq!(BombKind::line_for(Axis::Horizontal), BombKind::RowClear);
//! assert!(BombKind::ColorClear.is_bomb());
//! ```

use thiserror::Error;

/// Shortest run of identical pieces that forms a match
pub const MIN_RUN: usize = 3;

/// Run length that promotes the anchor to a line-clear bomb
pub const LINE_BOMB_RUN: usize = 4;

/// Run length (and above) that promotes the anchor to a color-clear bomb
pub const COLOR_BOMB_RUN: usize = 5;

/// Smallest catalog for which setup can avoid pre-made matches
pub const MIN_PIECE_TYPES: u8 = 3;

/// Largest accepted board width or height
pub const MAX_DIMENSION: u8 = 64;

/// Default board width
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height
pub const DEFAULT_HEIGHT: u8 = 8;

/// Default number of piece types
pub const DEFAULT_PIECE_TYPES: u8 = 6;

/// Index into the piece catalog
pub type PieceType = u8;

/// Stable identity of a spawned piece.
///
/// Ids are handed out by the piece factory in spawn order and never reused,
/// so a presentation layer can keep sprite state keyed by id even after the
/// piece has been destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u32);

impl PieceId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbors only; diagonal cells are not adjacent.
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx + dy == 1
    }

    /// Cell one step to the right; stays put at `i8::MAX`
    pub fn right(self) -> Pos {
        Pos::new(self.x.saturating_add(1), self.y)
    }

    /// Cell one step up; stays put at `i8::MAX`
    pub fn up(self) -> Pos {
        Pos::new(self.x, self.y.saturating_add(1))
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a run extends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

/// Special clear behavior carried by a piece
///
/// - **None**: plain piece
/// - **RowClear**: clears its whole row when triggered
/// - **ColumnClear**: clears its whole column when triggered
/// - **ColorClear**: clears every piece of one type when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BombKind {
    #[default]
    None,
    RowClear,
    ColumnClear,
    ColorClear,
}

impl BombKind {
    /// True for every kind except `None`
    pub fn is_bomb(&self) -> bool {
        !matches!(self, BombKind::None)
    }

    /// Line-clear kind whose blast follows the given run axis
    pub fn line_for(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => BombKind::RowClear,
            Axis::Vertical => BombKind::ColumnClear,
        }
    }

    /// Blast axis for line-clear kinds
    pub fn axis(&self) -> Option<Axis> {
        match self {
            BombKind::RowClear => Some(Axis::Horizontal),
            BombKind::ColumnClear => Some(Axis::Vertical),
            BombKind::None | BombKind::ColorClear => None,
        }
    }

    /// Strength order: plain < line clear < color clear
    pub fn rank(&self) -> u8 {
        match self {
            BombKind::None => 0,
            BombKind::RowClear | BombKind::ColumnClear => 1,
            BombKind::ColorClear => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BombKind::None => "none",
            BombKind::RowClear => "row_clear",
            BombKind::ColumnClear => "column_clear",
            BombKind::ColorClear => "color_clear",
        }
    }
}

/// Engine state machine: one resolution at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Awaiting input
    #[default]
    Idle,
    /// Match, bomb, collapse and refill loop in progress
    Resolving,
}

/// Errors surfaced by the board engine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Coordinate outside the grid (caller bug)
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    /// Swap between cells that do not share an edge
    #[error("cells {a} and {b} are not adjacent")]
    NotAdjacent { a: Pos, b: Pos },

    /// Swap requested while a resolution is in progress
    #[error("board is resolving a previous move")]
    Busy,

    /// Catalog too small to satisfy the setup constraints
    #[error("need at least {need} piece types, catalog has {have}")]
    InsufficientPieceTypes { have: u8, need: u8 },

    /// Color-clear bomb resolved without a target type
    #[error("color-clear bomb resolved without a target type")]
    MissingColorTarget,

    /// Swap requested on an empty cell
    #[error("cell ({x}, {y}) is empty")]
    EmptyCell { x: i8, y: i8 },

    /// Spawn requested for a type outside the catalog
    #[error("piece type {piece_type} is outside a catalog of {catalog_size}")]
    UnknownPieceType { piece_type: PieceType, catalog_size: u8 },

    /// Board dimensions outside 1..=MAX_DIMENSION
    #[error("board dimensions {width}x{height} are not supported")]
    InvalidDimensions { width: u8, height: u8 },
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
