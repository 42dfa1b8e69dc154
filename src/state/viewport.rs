//! Map viewport state management.
//!
//! This module encapsulates the visible map window: the geographic center and
//! the zoom (screen points per degree) of a plate-carrée projection.

use mapnote::GeoPoint;
use serde::{Deserialize, Serialize};

const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 200_000.0;

/// State related to the visible map window.
///
/// Responsibilities:
/// - Converting between geographic and screen coordinates
/// - Panning and zooming around an anchor
/// - Fitting a set of points into view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewport {
    /// Latitude at the canvas center
    center_lat: f64,
    /// Longitude at the canvas center
    center_lng: f64,
    /// Screen points per degree
    zoom: f32,
    /// Canvas rectangle of the last rendered frame
    #[serde(skip)]
    canvas: Option<egui::Rect>,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl MapViewport {
    /// Creates a viewport showing the whole world at a small scale.
    pub fn new() -> Self {
        Self {
            center_lat: 0.0,
            center_lng: 0.0,
            zoom: 3.0,
            canvas: None,
        }
    }

    // ===== Queries =====

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Returns the canvas rectangle of the last rendered frame.
    pub fn canvas(&self) -> Option<egui::Rect> {
        self.canvas
    }

    /// Projects a geographic point into the canvas.
    pub fn geo_to_screen(&self, point: GeoPoint, canvas: egui::Rect) -> egui::Pos2 {
        let c = canvas.center();
        let x = c.x + ((point.lng() - self.center_lng) as f32) * self.zoom;
        let y = c.y - ((point.lat() - self.center_lat) as f32) * self.zoom;
        egui::pos2(x, y)
    }

    /// Maps a canvas position back to a geographic point.
    pub fn screen_to_geo(&self, pos: egui::Pos2, canvas: egui::Rect) -> GeoPoint {
        let c = canvas.center();
        let lng = self.center_lng + ((pos.x - c.x) / self.zoom) as f64;
        let lat = self.center_lat - ((pos.y - c.y) / self.zoom) as f64;
        GeoPoint::new(lat, lng)
    }

    // ===== Mutations =====

    /// Records the canvas rectangle the map is painted into.
    pub fn set_canvas(&mut self, canvas: egui::Rect) {
        self.canvas = Some(canvas);
    }

    /// Moves the view so that `point` is at the canvas center.
    pub fn center_on(&mut self, point: GeoPoint) {
        self.center_lat = point.lat();
        self.center_lng = point.lng();
    }

    /// Moves the map by a screen-space drag delta.
    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.center_lng -= (delta.x / self.zoom) as f64;
        self.center_lat += (delta.y / self.zoom) as f64;
        self.center_lat = self.center_lat.clamp(-90.0, 90.0);
        self.center_lng = self.center_lng.clamp(-180.0, 180.0);
    }

    /// Zooms by `factor` keeping the geographic point under `anchor` fixed.
    pub fn zoom_around(&mut self, factor: f32, anchor: egui::Pos2, canvas: egui::Rect) {
        let before = self.screen_to_geo(anchor, canvas);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_geo(anchor, canvas);
        self.center_lat += before.lat() - after.lat();
        self.center_lng += before.lng() - after.lng();
    }

    /// Centers and scales the view so that `points` fill most of the canvas.
    pub fn fit(&mut self, points: &[GeoPoint], canvas: egui::Rect) {
        if points.is_empty() {
            return;
        }
        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_lng, mut max_lng) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_lat = min_lat.min(p.lat());
            max_lat = max_lat.max(p.lat());
            min_lng = min_lng.min(p.lng());
            max_lng = max_lng.max(p.lng());
        }

        self.center_lat = (min_lat + max_lat) / 2.0;
        self.center_lng = (min_lng + max_lng) / 2.0;

        let span_lat = (max_lat - min_lat).max(0.01) as f32;
        let span_lng = (max_lng - min_lng).max(0.01) as f32;
        let zoom = (canvas.width() / span_lng).min(canvas.height() / span_lat) * 0.8;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Returns a graticule spacing in degrees that keeps lines at least
    /// `min_px` apart.
    pub fn grid_step(&self, min_px: f32) -> f64 {
        const STEPS: [f64; 9] = [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 90.0];
        STEPS
            .iter()
            .copied()
            .find(|step| (*step as f32) * self.zoom >= min_px)
            .unwrap_or(90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn test_projection_round_trip() {
        let vp = MapViewport::new();
        let p = GeoPoint::new(10.0, 20.0);
        let screen = vp.geo_to_screen(p, canvas());
        assert_eq!(screen, egui::pos2(460.0, 270.0));

        let back = vp.screen_to_geo(screen, canvas());
        assert!((back.lat() - 10.0).abs() < 1e-4);
        assert!((back.lng() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut vp = MapViewport::new();
        let anchor = egui::pos2(600.0, 100.0);
        let before = vp.screen_to_geo(anchor, canvas());
        vp.zoom_around(4.0, anchor, canvas());
        let after = vp.screen_to_geo(anchor, canvas());

        assert_eq!(vp.zoom(), 12.0);
        assert!((before.lat() - after.lat()).abs() < 1e-4);
        assert!((before.lng() - after.lng()).abs() < 1e-4);
    }

    #[test]
    fn test_fit_centers_points() {
        let mut vp = MapViewport::new();
        vp.fit(&[GeoPoint::new(50.0, 10.0), GeoPoint::new(52.0, 14.0)], canvas());
        assert_eq!(vp.center(), GeoPoint::new(51.0, 12.0));
        // min(800 / 4, 600 / 2) with a 20% margin
        assert_eq!(vp.zoom(), 160.0);
    }
}
