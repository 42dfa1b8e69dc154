//! State management modules for the map window.
//!
//! This module contains state-only logic (no UI concerns):
//! - Viewport state (map center, zoom)
//! - Interaction state (marker drag, selection)

mod viewport;
mod interaction;

pub use viewport::MapViewport;
pub use interaction::InteractionState;
