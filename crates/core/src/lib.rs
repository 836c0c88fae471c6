//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the whole tile-matching state machine: the grid, the
//! piece catalog, match scanning, bomb resolution and the cascade loop. It has
//! **zero dependencies** on rendering, timing or I/O:
//!
//! - **Deterministic**: the same seed and the same swaps produce the same event log
//! - **Testable**: boards can be built cell by cell from type fixtures
//! - **Headless**: presentation is a [`PresentationSink`] that only receives events
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size board of optional pieces with bounds-checked access
//! - [`piece`]: piece records, the catalog and the spawning factory
//! - [`matcher`]: row/column scan for runs of three or more
//! - [`bomb`]: blast sets and bomb-spawn classification
//! - [`events`]: events emitted to the presentation layer
//! - [`engine`]: setup, swap validation, cascade loop and move search
//! - [`rng`]: seeded LCG used for setup and refill
//! - [`snapshot`]: plain per-cell view of the board
//! - [`config`]: board dimensions, catalog size and seed
//!
//! # Example
//!
//! ```
//! use gemfall_core::{BoardEngine, EngineConfig, EventLog};
//!
//! let config = EngineConfig { seed: 7, ..EngineConfig::default() };
//! let mut engine = BoardEngine::new(&config, EventLog::default()).unwrap();
//!
//! // Setup never leaves a ready-made match on the board.
//! assert!(gemfall_core::find_matches(engine.grid()).is_empty());
//!
//! if let Some((a, b)) = engine.find_possible_move() {
//!     let report = engine.request_swap(a, b).unwrap();
//!     assert!(report.accepted);
//!     assert!(engine.grid().is_full());
//! }
//! ```

pub mod bomb;
pub mod config;
pub mod engine;
pub mod events;
pub mod grid;
pub mod matcher;
pub mod piece;
pub mod rng;
pub mod snapshot;

pub use gemfall_types as types;

// Re-export commonly used types for convenience
pub use bomb::{
    classify_run_for_bomb_spawn, pieces_affected_by_bomb, resolve_swap_blast, Blast,
    BombSpawnDecision, Detonation,
};
pub use config::EngineConfig;
pub use engine::{BoardEngine, SwapReport};
pub use events::{BoardEvent, DestroyedPiece, EventLog, PresentationSink};
pub use grid::{Cell, Grid};
pub use matcher::{find_matches, has_match, matched_positions, MatchGroup};
pub use piece::{Piece, PieceCatalog, PieceFactory};
pub use rng::SimpleRng;
pub use snapshot::{BoardSnapshot, CellSnapshot};
