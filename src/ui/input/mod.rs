//! Input handling subsystem for UI interactions.
//!
//! This module contains all input handling logic:
//! - Map input handling (pan, zoom, clicks, marker drag, cursor tracking)
//! - Keyboard shortcuts

pub mod map_input_handler;
