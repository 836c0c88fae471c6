//! Input module (engine-facing).
//!
//! Turns cell selections into swap requests. It is independent of any UI
//! framework: whatever translates screen clicks to grid cells feeds them into
//! a [`Selector`], and a completed pair goes to the engine's `request_swap`.

pub mod selector;

pub use gemfall_types as types;

pub use selector::{SelectOutcome, Selector};
