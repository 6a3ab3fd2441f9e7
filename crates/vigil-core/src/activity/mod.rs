//! # Activity Tracking
//!
//! Debounced tracking of the last qualifying user interaction.
//!
//! Interaction sources (pointer, keyboard, touch, scroll) register with the
//! [`ActivityTracker`] and record through the returned [`ActivitySource`]
//! guard. The lifecycle controller reads the resulting idle time on every
//! evaluation tick.

pub mod tracker;

// Public API exports
pub use tracker::{ActivitySource, ActivityTracker, SourceKind};
