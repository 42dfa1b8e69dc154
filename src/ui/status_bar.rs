//! Status bar UI rendering
//!
//! Handles the bottom status bar: cursor position, drawing hints and the
//! result of the last operation.

use crate::app::AppState;
use eframe::egui;
use egui::{Color32, RichText};

/// Hint shown while a polygon is being drawn.
fn drawing_hint(state: &AppState) -> Option<String> {
    let workspace = &state.workspace;
    if workspace.main_area.is_editing() {
        return Some(format!(
            "Drawing main area: {} points | Click to add, Enter to finish, Esc to discard",
            workspace.main_area.points().len()
        ));
    }
    workspace.sub_areas.editing_area().map(|area| {
        format!(
            "Drawing {}: {} points | Click to add, Enter to finish, Esc to cancel",
            area.name,
            area.points.len()
        )
    })
}

/// Renders the status panel at the bottom of the window
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let cursor_text = match state.interaction.hover() {
            Some(p) => format!("{:>9.5}, {:>10.5}", p.lat(), p.lng()),
            None => "-".to_string(),
        };
        ui.label(RichText::new(cursor_text).monospace());
        ui.label(RichText::new("|").strong());

        let workspace = &state.workspace;
        ui.label(format!(
            "Locations: {} | Areas: {} | Boundary: {} points",
            workspace.coordinates.len(),
            workspace.sub_areas.areas().len(),
            workspace.main_area.area_points().len()
        ));

        if let Some(hint) = drawing_hint(state) {
            ui.label(RichText::new("|").strong());
            ui.label(RichText::new(hint).color(Color32::from_rgb(0xF5, 0x9E, 0x0B)));
        } else if let Some(message) = &state.status_message {
            ui.label(RichText::new("|").strong());
            ui.label(message);
        }
    });
}
