//! Backup document wire format.
//!
//! ```json
//! {
//!   "mainArea": { "areaPoints": [{"lat": 0.0, "lng": 0.0}] },
//!   "subAreas": [{"id": "...", "name": "...", "color": "#fff", "isEditing": false, "points": []}],
//!   "locations": [{"id": "...", "lat": 0.0, "lng": 0.0, "color": "#fff", "createdAt": 0}]
//! }
//! ```
//!
//! Every section is optional on input; a missing section leaves its store
//! untouched. Locations stay as raw JSON text until each one is decoded and
//! validated on its own, so a bad record (even one with an out-of-range
//! number) is dropped without rejecting the document.

use crate::geo::SerializedPoint;
use crate::store::SerializedSubArea;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Top-level backup document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_area: Option<MainAreaSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_areas: Option<Vec<SerializedSubArea>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Box<RawValue>>>,
}

/// Main boundary section of a [`BackupDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainAreaSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_points: Option<Vec<SerializedPoint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document() {
        let doc: BackupDocument = serde_json::from_str(r#"{"subAreas": []}"#).unwrap();
        assert!(doc.main_area.is_none());
        assert_eq!(doc.sub_areas, Some(Vec::new()));
        assert!(doc.locations.is_none());
    }

    #[test]
    fn test_null_sections_are_missing() {
        let doc: BackupDocument =
            serde_json::from_str(r#"{"mainArea": null, "locations": null}"#).unwrap();
        assert!(doc.main_area.is_none());
        assert!(doc.sub_areas.is_none());
        assert!(doc.locations.is_none());
    }

    #[test]
    fn test_wrong_section_type_is_rejected() {
        assert!(serde_json::from_str::<BackupDocument>(r#"{"subAreas": {"id": "x"}}"#).is_err());
        assert!(serde_json::from_str::<BackupDocument>(r#"[1, 2, 3]"#).is_err());
    }

    #[test]
    fn test_out_of_range_location_keeps_document() {
        let doc: BackupDocument =
            serde_json::from_str(r#"{"locations": [{"lat": 1e400}, {"lat": 1.0}]}"#).unwrap();
        let locations = doc.locations.unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].get(), r#"{"lat": 1e400}"#);
    }

    #[test]
    fn test_sub_area_defaults() {
        let doc: BackupDocument =
            serde_json::from_str(r#"{"subAreas": [{"id": "area_1", "name": "A"}]}"#).unwrap();
        let area = &doc.sub_areas.unwrap()[0];
        assert_eq!(area.color, crate::color::DEFAULT_COLOR);
        assert!(!area.is_editing);
        assert!(area.points.is_empty());
    }
}
