//! Geographic point type and its plain-record serializer.
//!
//! `GeoPoint` is the value type every store works with. It is never persisted
//! directly: all storage and backup formats lower it to a `{lat, lng}` record
//! through [`SerializedPoint`].

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns the longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Persisted and exported form of a [`GeoPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializedPoint {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for SerializedPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
        }
    }
}

impl From<SerializedPoint> for GeoPoint {
    fn from(point: SerializedPoint) -> Self {
        GeoPoint::new(point.lat, point.lng)
    }
}

/// Lowers a vertex list to its serialized records.
pub fn serialize_points(points: &[GeoPoint]) -> Vec<SerializedPoint> {
    points.iter().copied().map(SerializedPoint::from).collect()
}

/// Restores a vertex list from serialized records.
pub fn deserialize_points(points: &[SerializedPoint]) -> Vec<GeoPoint> {
    points.iter().copied().map(GeoPoint::from).collect()
}

/// Closed ring covering the whole map, clockwise from the south-west corner.
pub const WORLD_RING: [[f64; 2]; 5] = [
    [-90.0, -180.0],
    [-90.0, 180.0],
    [90.0, 180.0],
    [90.0, -180.0],
    [-90.0, -180.0],
];

/// Returns [`WORLD_RING`] as points.
pub fn world_ring() -> Vec<GeoPoint> {
    WORLD_RING
        .iter()
        .map(|[lat, lng]| GeoPoint::new(*lat, *lng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&SerializedPoint::from(GeoPoint::new(52.5, 13.4))).unwrap();
        assert_eq!(json, r#"{"lat":52.5,"lng":13.4}"#);
    }

    #[test]
    fn test_world_ring_is_closed() {
        let ring = world_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
