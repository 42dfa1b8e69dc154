//! Mouse interaction state on the map canvas.
//!
//! This module tracks marker dragging and the selected marker. Map panning is
//! handled directly by the viewport and needs no state of its own.

use mapnote::GeoPoint;

/// State related to ongoing mouse interactions on the map.
///
/// Responsibilities:
/// - Tracking which marker is being dragged and where it would land
/// - Remembering the selected marker for highlighting
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Id of the marker under an active drag
    dragging_marker: Option<String>,
    /// Position the dragged marker would be dropped at
    drag_target: Option<GeoPoint>,
    /// Marker highlighted in the map and in the list
    selected_marker: Option<String>,
    /// Geographic position under the pointer
    hover: Option<GeoPoint>,
}

impl InteractionState {
    /// Creates a new interaction state with no active interactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all interaction state.
    pub fn reset(&mut self) {
        self.dragging_marker = None;
        self.drag_target = None;
        self.selected_marker = None;
        self.hover = None;
    }

    // ===== Marker Drag =====

    /// Starts dragging the marker with `id`.
    pub fn begin_drag(&mut self, id: &str, at: GeoPoint) {
        self.dragging_marker = Some(id.to_string());
        self.drag_target = Some(at);
        self.selected_marker = Some(id.to_string());
    }

    /// Moves the pending drop position of the dragged marker.
    pub fn update_drag(&mut self, at: GeoPoint) {
        if self.dragging_marker.is_some() {
            self.drag_target = Some(at);
        }
    }

    /// Ends the drag and returns the marker id and its drop position.
    pub fn finish_drag(&mut self) -> Option<(String, GeoPoint)> {
        let id = self.dragging_marker.take()?;
        let target = self.drag_target.take()?;
        Some((id, target))
    }

    /// Returns the dragged marker id and its pending position, if any.
    pub fn drag_preview(&self) -> Option<(&str, GeoPoint)> {
        match (&self.dragging_marker, self.drag_target) {
            (Some(id), Some(target)) => Some((id.as_str(), target)),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging_marker.is_some()
    }

    // ===== Selection =====

    pub fn select_marker(&mut self, id: Option<String>) {
        self.selected_marker = id;
    }

    pub fn selected_marker(&self) -> Option<&str> {
        self.selected_marker.as_deref()
    }

    // ===== Hover =====

    pub fn set_hover(&mut self, at: Option<GeoPoint>) {
        self.hover = at;
    }

    pub fn hover(&self) -> Option<GeoPoint> {
        self.hover
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_lifecycle() {
        let mut state = InteractionState::new();
        assert!(state.finish_drag().is_none());

        state.begin_drag("loc_1", GeoPoint::new(1.0, 2.0));
        state.update_drag(GeoPoint::new(3.0, 4.0));
        assert_eq!(state.drag_preview(), Some(("loc_1", GeoPoint::new(3.0, 4.0))));

        let (id, at) = state.finish_drag().unwrap();
        assert_eq!(id, "loc_1");
        assert_eq!(at, GeoPoint::new(3.0, 4.0));
        assert!(!state.is_dragging());
        assert_eq!(state.selected_marker(), Some("loc_1"));
    }

    #[test]
    fn test_update_without_drag_is_ignored() {
        let mut state = InteractionState::new();
        state.update_drag(GeoPoint::new(3.0, 4.0));
        assert!(state.drag_preview().is_none());
    }
}
