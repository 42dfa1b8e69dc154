//! Presentation layer for visual styling and polygon painting.
//!
//! This module contains presentation logic separated from the stores:
//! - Color mapping for markers and areas
//! - Scanline filling of polygons and the main-area vignette

pub mod color_mapping;
pub mod polygon_fill;
