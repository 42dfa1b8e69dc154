//! Main area editor: the single boundary polygon of the map.
//!
//! Two states: idle, and editing with a draft vertex list. Leaving the editing
//! state commits the draft as the new boundary when it forms a polygon
//! (more than two vertices) and discards it otherwise.

use super::ImportMode;
use crate::color::{validate_color, DEFAULT_MAIN_AREA_COLOR};
use crate::error::ValidationError;
use crate::geo::{deserialize_points, serialize_points, world_ring, GeoPoint, SerializedPoint};
use crate::storage::{load_value, load_value_or, save_value, SharedStorage};
use serde::{Deserialize, Serialize};

/// Storage key for the editor state, including the uncommitted draft.
pub const AREA_EDITOR_KEY: &str = "flippermap_area_editor";
/// Storage key for the boundary color.
pub const MAIN_AREA_COLOR_KEY: &str = "flippermap_main_area_color";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerializedAreaEditor {
    #[serde(default)]
    is_editing: bool,
    #[serde(default)]
    points: Vec<SerializedPoint>,
    #[serde(default)]
    area_points: Vec<SerializedPoint>,
}

/// Editor for the main boundary polygon.
pub struct MainAreaEditor {
    storage: SharedStorage,
    is_editing: bool,
    /// Draft vertices collected while editing
    points: Vec<GeoPoint>,
    /// Committed boundary
    area_points: Vec<GeoPoint>,
    color: String,
}

impl std::fmt::Debug for MainAreaEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainAreaEditor")
            .field("is_editing", &self.is_editing)
            .field("points", &self.points)
            .field("area_points", &self.area_points)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl MainAreaEditor {
    /// Loads the editor state and boundary color from storage.
    pub fn open(storage: SharedStorage) -> Self {
        let (state, color) = {
            let backend = storage.borrow();
            let state: SerializedAreaEditor = load_value(&*backend, AREA_EDITOR_KEY);
            let color: String =
                load_value_or(&*backend, MAIN_AREA_COLOR_KEY, DEFAULT_MAIN_AREA_COLOR.to_string());
            (state, color)
        };
        let color = if validate_color(&color).is_ok() {
            color
        } else {
            log::warn!("Ignoring stored main area color {:?}", color);
            DEFAULT_MAIN_AREA_COLOR.to_string()
        };

        Self {
            storage,
            is_editing: state.is_editing,
            points: deserialize_points(&state.points),
            area_points: deserialize_points(&state.area_points),
            color,
        }
    }

    // ===== Queries =====

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Returns the draft vertices.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Returns the committed boundary.
    pub fn area_points(&self) -> &[GeoPoint] {
        &self.area_points
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the vertex set currently shown: the draft while editing with at
    /// least one vertex, otherwise the committed boundary.
    pub fn active_points(&self) -> &[GeoPoint] {
        if self.is_editing && !self.points.is_empty() {
            &self.points
        } else {
            &self.area_points
        }
    }

    /// Returns the rings of an inverse mask over everything outside the
    /// active polygon: the world bounds followed by the polygon itself.
    /// Empty when the active set has fewer than three vertices.
    pub fn vignette_polygon(&self) -> Vec<Vec<GeoPoint>> {
        let active = self.active_points();
        if active.len() < 3 {
            return Vec::new();
        }
        vec![world_ring(), active.to_vec()]
    }

    // ===== Mutations =====

    /// Enters or leaves editing mode.
    pub fn toggle_editing(&mut self) {
        if self.is_editing {
            let draft = std::mem::take(&mut self.points);
            if draft.len() > 2 {
                log::info!("Committed main area with {} vertices", draft.len());
                self.area_points = draft;
            } else {
                log::debug!("Discarded main area draft with {} vertices", draft.len());
            }
            self.is_editing = false;
        } else {
            self.points.clear();
            self.is_editing = true;
        }
        self.persist_state();
    }

    /// Appends a draft vertex. Ignored unless editing.
    pub fn add_point(&mut self, point: GeoPoint) {
        if !self.is_editing {
            log::debug!("add_point ignored: main area is not being edited");
            return;
        }
        self.points.push(point);
        self.persist_state();
    }

    /// Drops the most recent draft vertex, if any.
    pub fn remove_last_point(&mut self) {
        if self.points.pop().is_some() {
            self.persist_state();
        }
    }

    /// Discards the draft and leaves editing mode without committing.
    pub fn reset_points(&mut self) {
        self.points.clear();
        self.is_editing = false;
        self.persist_state();
    }

    /// Sets the boundary color.
    pub fn set_color(&mut self, color: &str) -> Result<(), ValidationError> {
        validate_color(color)?;
        self.color = color.to_string();
        save_value(&self.storage, MAIN_AREA_COLOR_KEY, &self.color);
        Ok(())
    }

    /// Installs imported boundary vertices. `Add` appends them to the existing
    /// boundary; `Replace` overwrites it.
    pub fn import_area_points(&mut self, points: Vec<GeoPoint>, mode: ImportMode) -> usize {
        let count = points.len();
        self.area_points = match mode {
            ImportMode::Replace => points,
            ImportMode::Add => {
                let mut combined = self.area_points.clone();
                combined.extend(points);
                combined
            }
        };
        self.persist_state();
        count
    }

    /// Removes the boundary and any draft.
    pub fn clear(&mut self) {
        self.points.clear();
        self.area_points.clear();
        self.is_editing = false;
        self.persist_state();
    }

    fn persist_state(&self) {
        let state = SerializedAreaEditor {
            is_editing: self.is_editing,
            points: serialize_points(&self.points),
            area_points: serialize_points(&self.area_points),
        };
        save_value(&self.storage, AREA_EDITOR_KEY, &state);
    }
}
