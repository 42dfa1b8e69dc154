//! Export and import of a whole workspace as one backup document.

use super::document::{BackupDocument, MainAreaSection};
use crate::error::ImportError;
use crate::geo::{deserialize_points, serialize_points};
use crate::store::{CoordinateRegistry, ImportMode, SerializedSubArea, SubArea};
use crate::workspace::Workspace;
use serde::Serialize;

/// What an import changed, per section. `None` marks a section that was
/// absent from the document and therefore left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub main_area_points: Option<usize>,
    pub sub_areas: Option<usize>,
    pub locations: Option<usize>,
    /// Location records dropped because they failed validation
    pub rejected_locations: usize,
}

impl ImportSummary {
    /// Number of location records imported, if the section was present.
    pub fn imported(&self) -> Option<usize> {
        self.locations
    }
}

/// Serializable report of an import attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<ImportSummary, ImportError>> for ImportOutcome {
    fn from(result: &Result<ImportSummary, ImportError>) -> Self {
        match result {
            Ok(summary) => Self {
                success: true,
                imported: summary.imported(),
                error: None,
            },
            Err(e) => Self {
                success: false,
                imported: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Coordinates whole-workspace export and import.
///
/// Holds no data: an import parses and validates the entire document before
/// touching any store, so a failed import changes nothing.
pub struct BackupCoordinator;

impl BackupCoordinator {
    /// Builds the backup document for the current workspace state.
    pub fn snapshot(workspace: &Workspace) -> BackupDocument {
        let locations = workspace
            .coordinates
            .list()
            .iter()
            .filter_map(|c| match serde_json::value::to_raw_value(c) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    log::error!("Failed to serialize location {:?}: {}", c.id, e);
                    None
                }
            })
            .collect();

        BackupDocument {
            main_area: Some(MainAreaSection {
                area_points: Some(serialize_points(workspace.main_area.area_points())),
            }),
            sub_areas: Some(
                workspace
                    .sub_areas
                    .areas()
                    .iter()
                    .map(SerializedSubArea::from)
                    .collect(),
            ),
            locations: Some(locations),
        }
    }

    /// Serializes the workspace as a pretty-printed backup document.
    pub fn export_all(workspace: &Workspace) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string_pretty(&Self::snapshot(workspace))?;
        log::info!(
            "Exported {} locations, {} sub-areas, {} main area vertices",
            workspace.coordinates.len(),
            workspace.sub_areas.areas().len(),
            workspace.main_area.area_points().len()
        );
        Ok(json)
    }

    /// Parses `text` as a backup document and applies it to `workspace`.
    ///
    /// In `Add` mode sub-areas and locations are appended and main area
    /// vertices are appended to the existing boundary. Location records that
    /// fail validation are dropped and counted.
    pub fn import_all(
        workspace: &mut Workspace,
        text: &str,
        mode: ImportMode,
    ) -> Result<ImportSummary, ImportError> {
        let document: BackupDocument = serde_json::from_str(text).map_err(|e| {
            log::warn!("Rejected backup document: {}", e);
            ImportError::from(e)
        })?;
        Ok(Self::apply(workspace, document, mode))
    }

    /// Like [`import_all`](Self::import_all) with the mode given as text
    /// (`"replace"` or `"add"`).
    pub fn import_all_str(
        workspace: &mut Workspace,
        text: &str,
        mode: &str,
    ) -> Result<ImportSummary, ImportError> {
        let mode: ImportMode = mode.parse()?;
        Self::import_all(workspace, text, mode)
    }

    /// Applies an already-parsed document.
    pub fn apply(workspace: &mut Workspace, document: BackupDocument, mode: ImportMode) -> ImportSummary {
        let main_points = document
            .main_area
            .and_then(|section| section.area_points)
            .map(|points| deserialize_points(&points));
        let sub_areas = document
            .sub_areas
            .map(|areas| areas.into_iter().map(SubArea::from).collect::<Vec<_>>());
        let locations = document.locations.map(CoordinateRegistry::validate_records);

        let mut summary = ImportSummary::default();

        if let Some(points) = main_points {
            summary.main_area_points = Some(workspace.main_area.import_area_points(points, mode));
        }
        if let Some(areas) = sub_areas {
            summary.sub_areas = Some(workspace.sub_areas.import_areas(areas, mode));
            // An imported sub-area editor takes over from the main area editor
            if workspace.sub_areas.editing_area().is_some() && workspace.main_area.is_editing() {
                log::info!("Imported sub-area is being edited, closing main area editor");
                workspace.main_area.toggle_editing();
            }
        }
        if let Some((valid, rejected)) = locations {
            summary.locations = Some(workspace.coordinates.import(valid, mode));
            summary.rejected_locations = rejected;
        }

        log::info!("Applied backup ({}): {:?}", mode, summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn test_malformed_json_changes_nothing() {
        let mut ws = Workspace::in_memory();
        ws.coordinates.add(1.0, 1.0, None, None).unwrap();

        let result = BackupCoordinator::import_all(&mut ws, "{not json", ImportMode::Replace);
        assert!(matches!(result, Err(ImportError::Parse(_))));
        assert_eq!(ws.coordinates.len(), 1);

        let outcome = ImportOutcome::from(&result);
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_bad_sub_area_section_rejects_whole_document() {
        let mut ws = Workspace::in_memory();
        let text = r##"{
            "locations": [{"id": "a", "lat": 1, "lng": 1, "color": "#fff", "createdAt": 1}],
            "subAreas": [{"name": "missing id"}]
        }"##;

        assert!(BackupCoordinator::import_all(&mut ws, text, ImportMode::Add).is_err());
        assert!(ws.coordinates.is_empty());
    }

    #[test]
    fn test_missing_sections_are_untouched() {
        let mut ws = Workspace::in_memory();
        ws.coordinates.add(1.0, 1.0, None, None).unwrap();
        ws.sub_areas.create("A", "#fff").unwrap();
        ws.main_area.import_area_points(
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0), GeoPoint::new(1.0, 1.0)],
            ImportMode::Replace,
        );

        let summary =
            BackupCoordinator::import_all(&mut ws, r#"{"mainArea": {}}"#, ImportMode::Replace)
                .unwrap();

        assert_eq!(summary, ImportSummary::default());
        assert_eq!(ws.coordinates.len(), 1);
        assert_eq!(ws.sub_areas.areas().len(), 1);
        assert_eq!(ws.main_area.area_points().len(), 3);
    }

    #[test]
    fn test_imported_editing_area_closes_main_editor() {
        let mut ws = Workspace::in_memory();
        ws.main_area.toggle_editing();
        ws.main_area.add_point(GeoPoint::new(0.0, 0.0));
        assert!(ws.main_area.is_editing());

        let text = r##"{
            "subAreas": [{"id": "area_1", "name": "A", "color": "#fff", "isEditing": true, "points": []}]
        }"##;
        BackupCoordinator::import_all(&mut ws, text, ImportMode::Add).unwrap();

        assert!(!ws.main_area.is_editing());
        assert_eq!(ws.sub_areas.editing_area().map(|a| a.id.as_str()), Some("area_1"));
    }

    #[test]
    fn test_out_of_range_location_drops_only_that_record() {
        let mut ws = Workspace::in_memory();
        let text = r##"{"locations": [
            {"id": "a", "lat": 1e400, "lng": 1, "color": "#fff", "createdAt": 1},
            {"id": "b", "lat": 2, "lng": 3, "color": "#fff", "createdAt": 2}
        ]}"##;

        let summary = BackupCoordinator::import_all(&mut ws, text, ImportMode::Replace).unwrap();

        assert_eq!(summary.locations, Some(1));
        assert_eq!(summary.rejected_locations, 1);
        assert_eq!(ws.coordinates.list()[0].id, "b");
    }

    #[test]
    fn test_unknown_mode_string() {
        let mut ws = Workspace::in_memory();
        assert!(matches!(
            BackupCoordinator::import_all_str(&mut ws, "{}", "merge"),
            Err(ImportError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn test_outcome_shape() {
        let ok: Result<ImportSummary, ImportError> = Ok(ImportSummary {
            locations: Some(3),
            ..Default::default()
        });
        let json = serde_json::to_value(ImportOutcome::from(&ok)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "imported": 3}));
    }
}
