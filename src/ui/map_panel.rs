//! Map panel UI rendering
//!
//! Paints the map canvas: graticule, world outline, the main area with its
//! vignette, sub-areas with the live drawing preview, and location markers.

use crate::app::AppState;
use crate::presentation::color_mapping::{hex_to_color32, with_alpha};
use crate::presentation::polygon_fill::fill_rings;
use crate::state::MapViewport;
use crate::ui::input::map_input_handler::{self, MapInteraction};
use eframe::egui;
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};
use mapnote::geo::world_ring;
use mapnote::GeoPoint;

const BACKGROUND: Color32 = Color32::from_rgb(0x1E, 0x29, 0x3B);
const LAND_OUTLINE: Color32 = Color32::from_rgb(0x64, 0x74, 0x8B);
const GRID: Color32 = Color32::from_rgb(0x33, 0x41, 0x55);
const MARKER_RADIUS: f32 = 7.0;

fn project(viewport: &MapViewport, points: &[GeoPoint], canvas: Rect) -> Vec<Pos2> {
    points.iter().map(|p| viewport.geo_to_screen(*p, canvas)).collect()
}

/// Renders the map canvas and handles its input.
pub fn render_map_panel(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    state: &mut AppState,
) -> Option<MapInteraction> {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let canvas = response.rect;
    state.viewport.set_canvas(canvas);

    let interaction = map_input_handler::handle_map_input(ctx, canvas, &response, state);

    painter.rect_filled(canvas, 0.0, BACKGROUND);
    if state.preferences.show_grid {
        draw_graticule(&painter, &state.viewport, canvas);
    }
    draw_world_outline(&painter, &state.viewport, canvas);
    draw_main_area(&painter, state, canvas);
    draw_sub_areas(&painter, state, canvas);
    draw_markers(&painter, state, canvas);

    if state.is_drawing() {
        ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
    } else if state.interaction.is_dragging() {
        ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
    } else if let Some(pos) = response.hover_pos() {
        if map_input_handler::hit_marker(state, pos, canvas).is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }
    }

    interaction
}

fn draw_graticule(painter: &Painter, viewport: &MapViewport, canvas: Rect) {
    let step = viewport.grid_step(60.0);
    let top_left = viewport.screen_to_geo(canvas.left_top(), canvas);
    let bottom_right = viewport.screen_to_geo(canvas.right_bottom(), canvas);
    let stroke = Stroke::new(1.0, GRID);

    let lat_min = bottom_right.lat().max(-90.0);
    let lat_max = top_left.lat().min(90.0);
    let lng_min = top_left.lng().max(-180.0);
    let lng_max = bottom_right.lng().min(180.0);

    let mut lat = (lat_min / step).ceil() * step;
    while lat <= lat_max {
        let a = viewport.geo_to_screen(GeoPoint::new(lat, lng_min), canvas);
        let b = viewport.geo_to_screen(GeoPoint::new(lat, lng_max), canvas);
        painter.line_segment([a, b], stroke);
        lat += step;
    }

    let mut lng = (lng_min / step).ceil() * step;
    while lng <= lng_max {
        let a = viewport.geo_to_screen(GeoPoint::new(lat_min, lng), canvas);
        let b = viewport.geo_to_screen(GeoPoint::new(lat_max, lng), canvas);
        painter.line_segment([a, b], stroke);
        lng += step;
    }
}

fn draw_world_outline(painter: &Painter, viewport: &MapViewport, canvas: Rect) {
    let ring = project(viewport, &world_ring(), canvas);
    painter.add(Shape::line(ring, Stroke::new(1.5, LAND_OUTLINE)));
}

/// Darkens everything outside the main area and outlines it.
fn draw_main_area(painter: &Painter, state: &AppState, canvas: Rect) {
    let main_area = &state.workspace.main_area;
    let color = hex_to_color32(main_area.color());

    let vignette: Vec<Vec<Pos2>> = main_area
        .vignette_polygon()
        .iter()
        .map(|ring| project(&state.viewport, ring, canvas))
        .collect();
    fill_rings(painter, &vignette, canvas, with_alpha(Color32::BLACK, 120));

    let active = project(&state.viewport, main_area.active_points(), canvas);
    if main_area.is_editing() {
        painter.add(Shape::line(active.clone(), Stroke::new(2.0, color)));
        if let (Some(last), Some(cursor)) = (active.last(), state.interaction.hover()) {
            let cursor = state.viewport.geo_to_screen(cursor, canvas);
            painter.line_segment([*last, cursor], Stroke::new(1.0, with_alpha(color, 140)));
        }
        for p in &active {
            painter.circle_filled(*p, 4.0, color);
        }
    } else if active.len() >= 3 {
        painter.add(Shape::closed_line(active, Stroke::new(2.0, color)));
    }
}

fn draw_sub_areas(painter: &Painter, state: &AppState, canvas: Rect) {
    let registry = &state.workspace.sub_areas;

    for area in registry.areas() {
        let color = hex_to_color32(&area.color);

        if area.is_editing {
            // Preview ring already ends on the first vertex once it has 3+ points
            let preview = project(&state.viewport, &registry.get_preview_points(&area.id), canvas);
            if preview.len() >= 4 {
                fill_rings(painter, std::slice::from_ref(&preview), canvas, with_alpha(color, 50));
            }
            painter.add(Shape::line(preview, Stroke::new(2.0, color)));
            for p in project(&state.viewport, &area.points, canvas) {
                painter.circle_filled(p, 4.0, color);
                painter.circle_stroke(p, 4.0, Stroke::new(1.0, Color32::WHITE));
            }
        } else if area.points.len() >= 3 {
            let ring = project(&state.viewport, &area.points, canvas);
            fill_rings(painter, std::slice::from_ref(&ring), canvas, with_alpha(color, 70));
            if let Some(label_at) = centroid(&ring) {
                painter.text(
                    label_at,
                    egui::Align2::CENTER_CENTER,
                    &area.name,
                    egui::FontId::proportional(13.0),
                    Color32::WHITE,
                );
            }
            painter.add(Shape::closed_line(ring, Stroke::new(1.5, color)));
        } else {
            let line = project(&state.viewport, &area.points, canvas);
            painter.add(Shape::line(line, Stroke::new(1.5, color)));
        }
    }
}

fn draw_markers(painter: &Painter, state: &AppState, canvas: Rect) {
    let drag = state.interaction.drag_preview();
    let selected = state.interaction.selected_marker();

    for coordinate in state.workspace.coordinates.list() {
        let position = match drag {
            Some((id, target)) if id == coordinate.id => target,
            _ => coordinate.position(),
        };
        let center = state.viewport.geo_to_screen(position, canvas);
        if !canvas.expand(MARKER_RADIUS).contains(center) {
            continue;
        }

        let color = hex_to_color32(&coordinate.color);
        if selected == Some(coordinate.id.as_str()) {
            painter.circle_stroke(center, MARKER_RADIUS + 4.0, Stroke::new(2.0, Color32::WHITE));
        }
        painter.circle_filled(center, MARKER_RADIUS, color);
        painter.circle_stroke(center, MARKER_RADIUS, Stroke::new(1.5, Color32::WHITE));
        painter.text(
            center + egui::vec2(MARKER_RADIUS + 4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            coordinate.display_name(),
            egui::FontId::proportional(12.0),
            Color32::WHITE,
        );
    }

    // Pending form position
    if let (Some(lat), Some(lng)) = (state.form.lat, state.form.lng) {
        let center = state.viewport.geo_to_screen(GeoPoint::new(lat, lng), canvas);
        let stroke = Stroke::new(1.5, hex_to_color32(&state.form.color));
        painter.line_segment([center - egui::vec2(6.0, 0.0), center + egui::vec2(6.0, 0.0)], stroke);
        painter.line_segment([center - egui::vec2(0.0, 6.0), center + egui::vec2(0.0, 6.0)], stroke);
    }
}

/// Vertex average, good enough for placing a label.
fn centroid(points: &[Pos2]) -> Option<Pos2> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(egui::Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f32).to_pos2())
}
