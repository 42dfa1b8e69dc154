//! Centralized application state for the map window.
//!
//! The annotation data lives in the library's [`Workspace`]; this struct
//! composes it with the view-only state components so that UI code can borrow
//! each part independently.

use crate::state::{InteractionState, MapViewport};
use mapnote::color::DEFAULT_COLOR;
use mapnote::{ImportMode, LocationForm, Workspace};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User preferences persisted through eframe storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Color preselected in the location form
    pub marker_color: String,
    /// Mode used by the import button
    pub import_mode: ImportMode,
    /// Directory the last backup was read from or written to
    pub last_backup_dir: Option<PathBuf>,
    /// Whether the graticule is drawn
    pub show_grid: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            marker_color: DEFAULT_COLOR.to_string(),
            import_mode: ImportMode::Replace,
            last_backup_dir: None,
            show_grid: true,
        }
    }
}

/// Main application state composed of focused state components.
pub struct AppState {
    // ===== Annotation Data =====
    /// Coordinates, main area and sub-areas with their storage
    pub workspace: Workspace,

    /// Fields of the "add location" form
    pub form: LocationForm,

    // ===== View State =====
    /// Visible map window
    pub viewport: MapViewport,

    /// Marker drag and selection
    pub interaction: InteractionState,

    /// Persisted user preferences
    pub preferences: Preferences,

    // ===== Top-Level State =====
    /// Current error message to display (if any)
    pub error_message: Option<String>,

    /// Result of the last completed operation
    pub status_message: Option<String>,
}

impl AppState {
    /// Creates the state around a loaded workspace.
    pub fn new(workspace: Workspace, preferences: Preferences, viewport: MapViewport) -> Self {
        let mut form = LocationForm::new();
        form.color = preferences.marker_color.clone();

        Self {
            workspace,
            form,
            viewport,
            interaction: InteractionState::new(),
            preferences,
            error_message: None,
            status_message: None,
        }
    }

    // ===== High-Level Coordination Methods =====

    /// Returns true while a click on the map adds a polygon vertex.
    pub fn is_drawing(&self) -> bool {
        self.workspace.main_area.is_editing() || self.workspace.sub_areas.editing_area().is_some()
    }

    /// Resets the form, keeping the preferred marker color.
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.form.color = self.preferences.marker_color.clone();
    }

    /// Records the outcome of an operation for the status bar.
    pub fn report<E: std::fmt::Display>(&mut self, result: Result<String, E>) {
        match result {
            Ok(message) => {
                self.status_message = Some(message);
                self.error_message = None;
            }
            Err(e) => {
                log::warn!("{}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }
}
