//! Color mapping for markers and polygons.
//!
//! This module provides functions for:
//! - Converting stored hex colors (`#RGB` / `#RRGGBB`) to egui colors
//! - Deriving translucent fills and outlines from a base color
//! - Picking palette colors for new markers and areas

use egui::Color32;
use mapnote::color::hex_to_rgb;

/// Palette offered for new markers and sub-areas.
pub const PALETTE: [&str; 10] = [
    "#3B82F6", // Blue
    "#EF4444", // Red
    "#10B981", // Green
    "#F59E0B", // Yellow
    "#8B5CF6", // Purple
    "#EC4899", // Pink
    "#14B8A6", // Teal
    "#F97316", // Orange
    "#6366F1", // Indigo
    "#84CC16", // Lime
];

/// Converts a stored hex color to Color32, falling back to gray.
pub fn hex_to_color32(hex: &str) -> Color32 {
    match hex_to_rgb(hex) {
        Some((r, g, b)) => Color32::from_rgb(r, g, b),
        None => Color32::GRAY,
    }
}

/// Sets the alpha channel of a color.
pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Returns the palette color following the `index`-th one, wrapping around.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Picks a random palette color.
pub fn random_palette_color() -> &'static str {
    use rand::Rng;
    palette_color(rand::thread_rng().gen_range(0..PALETTE.len()))
}
