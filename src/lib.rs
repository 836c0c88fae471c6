//! Gemfall (workspace facade crate).
//!
//! Re-exports the member crates as `gemfall::{types, core, input, adapter}` so
//! embedders depend on one package while the implementation lives under
//! `crates/`.

pub use gemfall_adapter as adapter;
pub use gemfall_core as core;
pub use gemfall_input as input;
pub use gemfall_types as types;
