//! Scanline fill for non-convex polygons and polygons with holes.
//!
//! egui only fills convex paths, so area fills and the main-area vignette are
//! painted as horizontal bands. Each band covers the spans that are inside
//! the ring set under the even-odd rule, which makes the second ring of the
//! vignette (world bounds + boundary) a hole in the first.

use egui::{Color32, Painter, Pos2, Rect};

/// Height of one fill band in points.
const BAND_HEIGHT: f32 = 3.0;

/// Returns the x-ranges inside `rings` on the horizontal line at `y`,
/// using the even-odd rule. Rings are treated as closed.
pub fn even_odd_spans(rings: &[Vec<Pos2>], y: f32) -> Vec<(f32, f32)> {
    let mut crossings: Vec<f32> = Vec::new();

    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        for (i, a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            // Half-open test so a vertex on the line is counted once
            if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                let t = (y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
    }

    crossings.sort_by(|a, b| a.total_cmp(b));
    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Fills the even-odd interior of `rings`, clipped to `clip`.
pub fn fill_rings(painter: &Painter, rings: &[Vec<Pos2>], clip: Rect, color: Color32) {
    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }

    let mut top = min_y.max(clip.top());
    let bottom = max_y.min(clip.bottom());
    while top < bottom {
        let band_bottom = (top + BAND_HEIGHT).min(bottom);
        let y = (top + band_bottom) * 0.5;
        for (x0, x1) in even_odd_spans(rings, y) {
            let x0 = x0.max(clip.left());
            let x1 = x1.min(clip.right());
            if x0 < x1 {
                let band = Rect::from_min_max(egui::pos2(x0, top), egui::pos2(x1, band_bottom));
                painter.rect_filled(band, 0.0, color);
            }
        }
        top = band_bottom;
    }
}
