//! Application-level coordination and workflow management.
//!
//! Turns panel interactions into store operations and records their outcome
//! in the status bar or error banner.

use crate::app::AppState;
use crate::presentation::color_mapping;
use mapnote::backup::DEFAULT_BACKUP_FILE_NAME;
use mapnote::{
    read_backup_file, write_backup_file, BackupCoordinator, CoordinatePatch, GeoPoint,
    ImportSummary, SubAreaPatch,
};
use std::path::{Path, PathBuf};

/// Coordinates application-level operations and workflows.
///
/// This struct is responsible for:
/// - Routing map clicks to the active editor or the location form
/// - Keeping main area and sub-area editing mutually exclusive
/// - Running backup export and import against files
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    // ===== Map Interactions =====

    /// Handles a click on empty map space.
    ///
    /// While the main area is being edited the point becomes a boundary
    /// vertex; while a sub-area is being edited it is appended to that area.
    /// Otherwise the location form is filled with the position.
    pub fn handle_map_click(state: &mut AppState, point: GeoPoint) {
        if state.workspace.main_area.is_editing() {
            state.workspace.main_area.add_point(point);
            return;
        }

        let editing = state.workspace.sub_areas.editing_area().map(|a| a.id.clone());
        match editing {
            Some(id) => state.workspace.sub_areas.add_point(&id, point),
            None => {
                state.form.fill(point.lat(), point.lng(), None, None);
                state.interaction.select_marker(None);
            }
        }
    }

    /// Handles a double click on empty map space: adds a marker there unless
    /// a polygon is being drawn.
    pub fn handle_map_double_click(state: &mut AppState, point: GeoPoint) {
        if state.is_drawing() {
            return;
        }
        state.form.fill(point.lat(), point.lng(), None, None);
        Self::submit_location(state);
    }

    /// Handles a click on a marker: selects it and loads it into the form.
    pub fn handle_marker_click(state: &mut AppState, id: &str) {
        let Some(coordinate) = state.workspace.coordinates.get(id) else {
            return;
        };
        let (lat, lng) = (coordinate.lat, coordinate.lng);
        let name = coordinate.name.clone();
        let color = coordinate.color.clone();

        state.form.fill(lat, lng, name.as_deref(), Some(color.as_str()));
        state.interaction.select_marker(Some(id.to_string()));
    }

    /// Moves a dragged marker to its drop position.
    pub fn handle_marker_moved(state: &mut AppState, id: &str, to: GeoPoint) {
        let result = state
            .workspace
            .coordinates
            .update(id, CoordinatePatch::position(to.lat(), to.lng()))
            .map(|()| format!("Moved marker to {:.5}, {:.5}", to.lat(), to.lng()));
        state.report(result);
    }

    /// Centers the map on a location from the list.
    pub fn focus_location(state: &mut AppState, id: &str) {
        if let Some(coordinate) = state.workspace.coordinates.get(id) {
            state.viewport.center_on(coordinate.position());
            Self::handle_marker_click(state, id);
        }
    }

    /// Fits the view to everything that has been drawn or placed.
    pub fn fit_view(state: &mut AppState) {
        let Some(canvas) = state.viewport.canvas() else {
            return;
        };
        let workspace = &state.workspace;
        let mut points: Vec<GeoPoint> = workspace.main_area.active_points().to_vec();
        points.extend(workspace.sub_areas.areas().iter().flat_map(|a| a.points.iter().copied()));
        points.extend(workspace.coordinates.list().iter().map(|c| c.position()));
        state.viewport.fit(&points, canvas);
    }

    // ===== Location Form =====

    /// Adds the location entered in the form.
    pub fn submit_location(state: &mut AppState) {
        let result = state
            .form
            .submit(&mut state.workspace.coordinates)
            .map(|c| format!("Added {}", c.display_name()));
        if result.is_ok() {
            state.reset_form();
        }
        state.report(result);
    }

    pub fn remove_location(state: &mut AppState, id: &str) {
        state.workspace.coordinates.remove(id);
        if state.interaction.selected_marker() == Some(id) {
            state.interaction.select_marker(None);
        }
    }

    pub fn clear_locations(state: &mut AppState) {
        state.workspace.coordinates.clear();
        state.interaction.reset();
        state.status_message = Some("Removed all locations".to_string());
    }

    // ===== Main Area =====

    /// Starts or finishes drawing the main area. Starting it stops any
    /// sub-area edit.
    pub fn toggle_main_area(state: &mut AppState) {
        if !state.workspace.main_area.is_editing() {
            state.workspace.sub_areas.stop_editing_all();
        }
        state.workspace.main_area.toggle_editing();

        if !state.workspace.main_area.is_editing() {
            let count = state.workspace.main_area.area_points().len();
            state.status_message = Some(format!("Main area has {} points", count));
        }
    }

    pub fn set_main_area_color(state: &mut AppState, color: &str) {
        let result = state.workspace.main_area.set_color(color).map(|()| "Main area color changed".to_string());
        state.report(result);
    }

    // ===== Sub-Areas =====

    /// Creates a draft sub-area with a random palette color and starts
    /// drawing it.
    pub fn new_sub_area(state: &mut AppState) {
        if state.workspace.main_area.is_editing() {
            state.workspace.main_area.toggle_editing();
        }
        let color = color_mapping::random_palette_color();
        let result = state
            .workspace
            .sub_areas
            .start_new_area(color)
            .map(|area| format!("Drawing {}", area.name));
        state.report(result);
    }

    pub fn edit_sub_area(state: &mut AppState, id: &str) {
        if state.workspace.main_area.is_editing() {
            state.workspace.main_area.toggle_editing();
        }
        state.workspace.sub_areas.start_editing(id);
    }

    pub fn rename_sub_area(state: &mut AppState, id: &str, name: String) {
        let patch = SubAreaPatch {
            name: Some(name),
            ..SubAreaPatch::default()
        };
        if let Err(e) = state.workspace.sub_areas.update_area(id, patch) {
            state.report(Err::<String, _>(e));
        }
    }

    pub fn set_sub_area_color(state: &mut AppState, id: &str, color: &str) {
        if let Err(e) = state.workspace.sub_areas.update_area_color(id, color) {
            state.report(Err::<String, _>(e));
        }
    }

    // ===== Keyboard =====

    /// Escape: drops a draft sub-area, stops editing an existing one, or
    /// discards the main area draft.
    pub fn cancel(state: &mut AppState) {
        let editing = state
            .workspace
            .sub_areas
            .editing_area()
            .map(|a| a.id.clone());

        if let Some(id) = editing {
            if state.workspace.sub_areas.is_draft(&id) {
                state.workspace.sub_areas.delete_area(&id);
                state.status_message = Some("Discarded new area".to_string());
            } else {
                state.workspace.sub_areas.stop_editing(&id);
            }
        } else if state.workspace.main_area.is_editing() {
            state.workspace.main_area.reset_points();
            state.status_message = Some("Discarded main area changes".to_string());
        } else {
            state.reset_form();
            state.interaction.reset();
        }
    }

    /// Enter: finishes whichever polygon is being drawn.
    pub fn finish(state: &mut AppState) {
        let editing = state
            .workspace
            .sub_areas
            .editing_area()
            .map(|a| a.id.clone());

        if let Some(id) = editing {
            state.workspace.sub_areas.stop_editing(&id);
        } else if state.workspace.main_area.is_editing() {
            Self::toggle_main_area(state);
        }
    }

    /// Ctrl+Z: removes the last vertex of whichever polygon is being drawn.
    pub fn undo_point(state: &mut AppState) {
        let editing = state
            .workspace
            .sub_areas
            .editing_area()
            .map(|a| a.id.clone());

        if let Some(id) = editing {
            state.workspace.sub_areas.remove_last_point(&id);
        } else if state.workspace.main_area.is_editing() {
            state.workspace.main_area.remove_last_point();
        }
    }

    // ===== Backup =====

    /// Suggested path for the export dialog.
    pub fn default_backup_path(state: &AppState) -> PathBuf {
        state
            .preferences
            .last_backup_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default()
            .join(DEFAULT_BACKUP_FILE_NAME)
    }

    /// Writes a backup of the whole workspace to `path`.
    pub fn export_to(state: &mut AppState, path: &Path) {
        let result = BackupCoordinator::export_all(&state.workspace)
            .map_err(anyhow::Error::from)
            .and_then(|json| write_backup_file(path, &json))
            .map(|()| format!("Exported to {}", path.display()));
        Self::remember_dir(state, path);
        state.report(result.map_err(|e| format!("Export failed: {:#}", e)));
    }

    /// Reads a backup from `path` and imports it with the preferred mode.
    pub fn import_from(state: &mut AppState, path: &Path) {
        let mode = state.preferences.import_mode;
        let result = read_backup_file(path).and_then(|text| {
            BackupCoordinator::import_all(&mut state.workspace, &text, mode).map_err(anyhow::Error::from)
        });
        Self::remember_dir(state, path);

        match result {
            Ok(summary) => {
                state.interaction.reset();
                state.report::<String>(Ok(Self::describe_import(&summary)));
            }
            Err(e) => state.report::<String>(Err(format!("Import failed: {:#}", e))),
        }
    }

    fn remember_dir(state: &mut AppState, path: &Path) {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            state.preferences.last_backup_dir = Some(dir.to_path_buf());
        }
    }

    fn describe_import(summary: &ImportSummary) -> String {
        let mut parts = Vec::new();
        if let Some(n) = summary.main_area_points {
            parts.push(format!("{} main area points", n));
        }
        if let Some(n) = summary.sub_areas {
            parts.push(format!("{} areas", n));
        }
        if let Some(n) = summary.locations {
            parts.push(format!("{} locations", n));
        }
        if summary.rejected_locations > 0 {
            parts.push(format!("{} invalid locations skipped", summary.rejected_locations));
        }
        if parts.is_empty() {
            "Nothing to import".to_string()
        } else {
            format!("Imported {}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Preferences;
    use crate::state::MapViewport;
    use mapnote::{ImportMode, Workspace};

    fn state() -> AppState {
        AppState::new(Workspace::in_memory(), Preferences::default(), MapViewport::new())
    }

    #[test]
    fn test_click_routes_to_main_area_first() {
        let mut state = state();
        ApplicationCoordinator::new_sub_area(&mut state);
        ApplicationCoordinator::toggle_main_area(&mut state);
        assert!(state.workspace.sub_areas.editing_area().is_none());

        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(1.0, 1.0));
        assert_eq!(state.workspace.main_area.points().len(), 1);
        assert!(state.workspace.sub_areas.areas()[0].points.is_empty());
    }

    #[test]
    fn test_click_routes_to_editing_sub_area() {
        let mut state = state();
        ApplicationCoordinator::new_sub_area(&mut state);
        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(1.0, 2.0));

        let area = &state.workspace.sub_areas.areas()[0];
        assert_eq!(area.name, "Area A");
        assert_eq!(area.points, vec![GeoPoint::new(1.0, 2.0)]);
        assert_eq!(state.form.lat, None);
    }

    #[test]
    fn test_click_fills_form_when_idle() {
        let mut state = state();
        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(48.1, 11.5));
        assert_eq!(state.form.lat, Some(48.1));
        assert_eq!(state.form.lng, Some(11.5));
        assert!(state.workspace.coordinates.is_empty());
    }

    #[test]
    fn test_double_click_adds_marker() {
        let mut state = state();
        ApplicationCoordinator::handle_map_double_click(&mut state, GeoPoint::new(48.1, 11.5));
        assert_eq!(state.workspace.coordinates.len(), 1);
        assert_eq!(state.workspace.coordinates.list()[0].name.as_deref(), Some("Location 1"));
        assert_eq!(state.form.lat, None);
    }

    #[test]
    fn test_cancel_discards_draft_sub_area() {
        let mut state = state();
        ApplicationCoordinator::new_sub_area(&mut state);
        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(1.0, 2.0));
        ApplicationCoordinator::cancel(&mut state);
        assert!(state.workspace.sub_areas.areas().is_empty());
    }

    #[test]
    fn test_cancel_keeps_finished_sub_area() {
        let mut state = state();
        ApplicationCoordinator::new_sub_area(&mut state);
        ApplicationCoordinator::finish(&mut state);
        let id = state.workspace.sub_areas.areas()[0].id.clone();

        ApplicationCoordinator::edit_sub_area(&mut state, &id);
        ApplicationCoordinator::cancel(&mut state);
        assert_eq!(state.workspace.sub_areas.areas().len(), 1);
        assert!(state.workspace.sub_areas.editing_area().is_none());
    }

    #[test]
    fn test_cancel_discards_main_area_draft() {
        let mut state = state();
        ApplicationCoordinator::toggle_main_area(&mut state);
        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(1.0, 1.0));
        ApplicationCoordinator::cancel(&mut state);

        assert!(!state.workspace.main_area.is_editing());
        assert!(state.workspace.main_area.points().is_empty());
    }

    #[test]
    fn test_undo_point_targets_active_editor() {
        let mut state = state();
        ApplicationCoordinator::new_sub_area(&mut state);
        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(1.0, 2.0));
        ApplicationCoordinator::handle_map_click(&mut state, GeoPoint::new(3.0, 4.0));
        ApplicationCoordinator::undo_point(&mut state);

        assert_eq!(state.workspace.sub_areas.areas()[0].points, vec![GeoPoint::new(1.0, 2.0)]);
    }

    #[test]
    fn test_marker_drag_updates_position() {
        let mut state = state();
        let c = state.workspace.coordinates.add(1.0, 2.0, None, None).unwrap();
        ApplicationCoordinator::handle_marker_moved(&mut state, &c.id, GeoPoint::new(3.0, 4.0));

        let moved = state.workspace.coordinates.get(&c.id).unwrap();
        assert_eq!((moved.lat, moved.lng), (3.0, 4.0));
        assert_eq!(moved.created_at, c.created_at);
    }

    #[test]
    fn test_invalid_submit_reports_error() {
        let mut state = state();
        state.form.fill(95.0, 0.0, None, None);
        ApplicationCoordinator::submit_location(&mut state);

        assert!(state.error_message.is_some());
        assert!(state.workspace.coordinates.is_empty());
        assert_eq!(state.form.lat, Some(95.0));
    }

    #[test]
    fn test_export_then_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json.br");

        let mut source = state();
        source.workspace.coordinates.add(1.0, 2.0, Some("A"), None).unwrap();
        ApplicationCoordinator::export_to(&mut source, &path);
        assert!(source.error_message.is_none());
        assert_eq!(source.preferences.last_backup_dir.as_deref(), Some(dir.path()));

        let mut target = state();
        target.preferences.import_mode = ImportMode::Add;
        ApplicationCoordinator::import_from(&mut target, &path);
        assert!(target.error_message.is_none());
        assert_eq!(target.workspace.coordinates.len(), 1);
        assert!(target.status_message.unwrap().contains("1 locations"));
    }

    #[test]
    fn test_import_missing_file_reports_error() {
        let mut state = state();
        ApplicationCoordinator::import_from(&mut state, Path::new("/nonexistent/backup.json"));
        assert!(state.error_message.unwrap().starts_with("Import failed"));
    }
}
