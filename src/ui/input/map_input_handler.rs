//! Map input handling for panning, zooming, clicking and marker dragging.
//!
//! This module handles all mouse input on the map canvas:
//! - Drag panning (left mouse + drag on empty map)
//! - Marker dragging (left mouse + drag on a marker, when not drawing)
//! - Scroll wheel zoom around the pointer
//! - Clicks and double clicks, reported as geographic positions
//! - Cursor tracking for the sub-area preview

use crate::app::AppState;
use mapnote::GeoPoint;

/// Marker hit radius in points.
const MARKER_HIT_RADIUS: f32 = 9.0;

/// Result of map input handling that needs the application coordinator.
pub enum MapInteraction {
    /// Empty map space was clicked
    Clicked(GeoPoint),
    /// Empty map space was double clicked
    DoubleClicked(GeoPoint),
    /// A marker was clicked
    MarkerClicked(String),
    /// A marker was dropped at a new position
    MarkerMoved { id: String, to: GeoPoint },
}

/// Returns the id of the topmost marker within reach of `pos`.
pub fn hit_marker(state: &AppState, pos: egui::Pos2, canvas: egui::Rect) -> Option<String> {
    state
        .workspace
        .coordinates
        .list()
        .iter()
        .rev()
        .find(|c| state.viewport.geo_to_screen(c.position(), canvas).distance(pos) <= MARKER_HIT_RADIUS)
        .map(|c| c.id.clone())
}

/// Handles all map input events and updates viewport and interaction state.
pub fn handle_map_input(
    ctx: &egui::Context,
    canvas: egui::Rect,
    response: &egui::Response,
    state: &mut AppState,
) -> Option<MapInteraction> {
    let mut result = None;
    let drawing = state.is_drawing();

    // Cursor tracking
    let hover = response.hover_pos().map(|pos| state.viewport.screen_to_geo(pos, canvas));
    state.interaction.set_hover(hover);
    if state.workspace.sub_areas.editing_area().is_some() || state.workspace.sub_areas.mouse_position().is_some() {
        state.workspace.sub_areas.update_mouse_position(hover);
    }

    // Scroll wheel zoom
    if let Some(pos) = response.hover_pos() {
        let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            state.viewport.zoom_around((scroll * 0.003).exp(), pos, canvas);
        }
    }

    // Drag: move a marker or pan the map
    if response.drag_started() && !drawing {
        if let Some(pos) = ctx.input(|i| i.pointer.press_origin()) {
            if let Some(id) = hit_marker(state, pos, canvas) {
                let at = state.viewport.screen_to_geo(pos, canvas);
                state.interaction.begin_drag(&id, at);
            }
        }
    }

    if response.dragged() {
        if state.interaction.is_dragging() {
            if let Some(pos) = response.interact_pointer_pos() {
                let at = state.viewport.screen_to_geo(pos.clamp(canvas.min, canvas.max), canvas);
                state.interaction.update_drag(at);
            }
        } else {
            state.viewport.pan_by(response.drag_delta());
        }
    }

    if response.drag_stopped() {
        if let Some((id, to)) = state.interaction.finish_drag() {
            result = Some(MapInteraction::MarkerMoved { id, to });
        }
    }

    // Clicks
    if let Some(pos) = response.interact_pointer_pos() {
        let at = state.viewport.screen_to_geo(pos, canvas);
        let marker = if drawing { None } else { hit_marker(state, pos, canvas) };

        if response.double_clicked() {
            if marker.is_none() {
                result = Some(MapInteraction::DoubleClicked(at));
            }
        } else if response.clicked() {
            result = Some(match marker {
                Some(id) => MapInteraction::MarkerClicked(id),
                None => MapInteraction::Clicked(at),
            });
        }
    }

    result
}

/// Keyboard commands on the map window.
pub enum KeyboardCommand {
    /// Escape
    Cancel,
    /// Enter while no text field has focus
    Finish,
    /// Ctrl+Z while drawing
    UndoPoint,
}

/// Reads keyboard shortcuts for the current frame.
pub fn handle_keyboard(ctx: &egui::Context) -> Option<KeyboardCommand> {
    let text_focused = ctx.memory(|m| m.focused().is_some());

    ctx.input(|i| {
        if i.key_pressed(egui::Key::Escape) {
            Some(KeyboardCommand::Cancel)
        } else if text_focused {
            None
        } else if i.key_pressed(egui::Key::Enter) {
            Some(KeyboardCommand::Finish)
        } else if i.modifiers.command && i.key_pressed(egui::Key::Z) {
            Some(KeyboardCommand::UndoPoint)
        } else {
            None
        }
    })
}
