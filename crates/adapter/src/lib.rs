//! Adapter module - feeding board events to a presentation layer
//!
//! The engine resolves moves synchronously and pushes [`BoardEvent`]s into a
//! [`PresentationSink`](gemfall_core::PresentationSink). This crate provides
//! sinks that carry those events out of the engine without letting timing
//! leak back in:
//!
//! - [`ChannelSink`] forwards events into a tokio unbounded channel; an
//!   [`EventPlayer`] on the other end hands them out paced by [`Pacing`],
//!   which is where animation delays belong.
//! - [`JsonLinesSink`] writes one JSON object per event to any `Write`,
//!   for logs or an external renderer.
//!
//! # Wire Format
//!
//! Events are internally tagged by `type` and numbered by `seq`:
//!
//! ```text
//! {"seq":1,"type":"swap_animate","first":12,"from":{"x":2,"y":0},"second":13,"to":{"x":3,"y":0}}
//! {"seq":2,"type":"pieces_destroyed","pieces":[{"id":4,"x":0,"y":0,"piece_type":1,"bomb":"none","detonated":false}]}
//! {"seq":3,"type":"cascade_settled"}
//! ```
//!
//! See [`protocol`] for the message definitions.
//!
//! [`BoardEvent`]: gemfall_core::BoardEvent

pub mod protocol;
pub mod recorder;
pub mod runtime;

pub use gemfall_core as core;
pub use gemfall_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use recorder::JsonLinesSink;
pub use runtime::{ChannelSink, EventPlayer, Pacing};
