//! Engine configuration - board size, catalog size and seed

use std::env;

use crate::types::{
    EngineError, EngineResult, DEFAULT_HEIGHT, DEFAULT_PIECE_TYPES, DEFAULT_WIDTH,
    MAX_DIMENSION, MIN_PIECE_TYPES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub catalog_size: u8,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            catalog_size: DEFAULT_PIECE_TYPES,
            seed: 1,
        }
    }
}

impl EngineConfig {
    /// Read `GEMFALL_WIDTH`, `GEMFALL_HEIGHT`, `GEMFALL_PIECE_TYPES` and
    /// `GEMFALL_SEED`; anything missing or unparsable keeps its default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            width: parse_var("GEMFALL_WIDTH").unwrap_or(defaults.width),
            height: parse_var("GEMFALL_HEIGHT").unwrap_or(defaults.height),
            catalog_size: parse_var("GEMFALL_PIECE_TYPES").unwrap_or(defaults.catalog_size),
            seed: parse_var("GEMFALL_SEED").unwrap_or(defaults.seed),
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        let dims_ok = (1..=MAX_DIMENSION).contains(&self.width)
            && (1..=MAX_DIMENSION).contains(&self.height);
        if !dims_ok {
            return Err(EngineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.catalog_size < MIN_PIECE_TYPES {
            return Err(EngineError::InsufficientPieceTypes {
                have: self.catalog_size,
                need: MIN_PIECE_TYPES,
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
