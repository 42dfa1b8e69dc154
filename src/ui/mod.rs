//! UI panel rendering subsystem
//!
//! This module contains all UI panel rendering logic for the map window:
//! - Header panel (main area controls, new area, backup, view options)
//! - Side panel (location form, location and area lists)
//! - Map panel (canvas painting)
//! - Status bar (cursor position, counts, hints)
//! - Panel manager (panel orchestration and layout)
//! - Input handling (mouse and keyboard interactions)

pub mod header;
pub mod side_panel;
pub mod map_panel;
pub mod status_bar;
pub mod panel_manager;
pub mod input;
