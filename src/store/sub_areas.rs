//! Sub-area registry: named polygons drawn inside the main area.
//!
//! At most one sub-area is edited at a time. Newly started areas are drafts
//! until editing stops, so an abandoned creation can be cancelled; the draft
//! marker lives only in memory and never reaches storage.

use super::{claim_id, ImportMode};
use crate::color::{is_hex_color, validate_color, DEFAULT_COLOR};
use crate::error::ValidationError;
use crate::geo::{deserialize_points, serialize_points, GeoPoint, SerializedPoint};
use crate::ids::{generate_id, now_millis};
use crate::storage::{load_value, save_value, SharedStorage};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Storage key for the sub-area list.
pub const SUB_AREAS_KEY: &str = "flippermap_subareas";

const ID_PREFIX: &str = "area";

/// A named polygon with its drawing-order vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct SubArea {
    pub id: String,
    pub name: String,
    pub color: String,
    pub points: Vec<GeoPoint>,
    pub is_editing: bool,
}

/// Stored and exported shape of a [`SubArea`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedSubArea {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_editing: bool,
    #[serde(default)]
    pub points: Vec<SerializedPoint>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl From<&SubArea> for SerializedSubArea {
    fn from(area: &SubArea) -> Self {
        Self {
            id: area.id.clone(),
            name: area.name.clone(),
            color: area.color.clone(),
            is_editing: area.is_editing,
            points: serialize_points(&area.points),
        }
    }
}

impl From<SerializedSubArea> for SubArea {
    fn from(area: SerializedSubArea) -> Self {
        Self {
            points: deserialize_points(&area.points),
            id: area.id,
            name: area.name,
            color: area.color,
            is_editing: area.is_editing,
        }
    }
}

/// Partial update for a [`SubArea`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubAreaPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub points: Option<Vec<GeoPoint>>,
    pub is_editing: Option<bool>,
}

/// Picks `"Area <letter>"` for the first letter A..Z not already used by a
/// name of the form `<letter>` or `Area <letter>` (case-insensitive). Falls
/// back to `"Area <n+1>"` once every letter is taken.
pub fn next_letter_name<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut used = HashSet::new();
    let mut count = 0;
    for name in names {
        count += 1;
        if let Some(letter) = name_letter(name) {
            used.insert(letter);
        }
    }

    match ('A'..='Z').find(|letter| !used.contains(letter)) {
        Some(letter) => format!("Area {}", letter),
        None => format!("Area {}", count + 1),
    }
}

fn name_letter(name: &str) -> Option<char> {
    let name = name.trim();
    let rest = match name.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("area") => {
            let tail = &name[4..];
            let trimmed = tail.trim_start();
            if trimmed.len() == tail.len() {
                // "Areax" is not "Area x"
                return None;
            }
            trimmed
        }
        _ => name,
    };

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Registry of sub-areas persisted under [`SUB_AREAS_KEY`].
pub struct SubAreaRegistry {
    storage: SharedStorage,
    areas: Vec<SubArea>,
    /// Ids of areas created but not yet confirmed (runtime only)
    draft_ids: HashSet<String>,
    /// Live cursor position used for the preview polygon
    mouse_position: Option<GeoPoint>,
    /// Epoch millis of the last mutation, strictly increasing
    last_updated: i64,
}

impl std::fmt::Debug for SubAreaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubAreaRegistry")
            .field("areas", &self.areas)
            .field("draft_ids", &self.draft_ids)
            .field("last_updated", &self.last_updated)
            .finish_non_exhaustive()
    }
}

impl SubAreaRegistry {
    /// Loads the registry from storage. No area starts as a draft.
    pub fn open(storage: SharedStorage) -> Self {
        let stored: Vec<SerializedSubArea> = load_value(&*storage.borrow(), SUB_AREAS_KEY);

        Self {
            storage,
            areas: stored.into_iter().map(SubArea::from).collect(),
            draft_ids: HashSet::new(),
            mouse_position: None,
            last_updated: now_millis(),
        }
    }

    // ===== Queries =====

    pub fn areas(&self) -> &[SubArea] {
        &self.areas
    }

    pub fn get_area(&self, id: &str) -> Option<&SubArea> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Returns the area currently being edited, if any.
    pub fn editing_area(&self) -> Option<&SubArea> {
        self.areas.iter().find(|a| a.is_editing)
    }

    pub fn is_draft(&self, id: &str) -> bool {
        self.draft_ids.contains(id)
    }

    pub fn mouse_position(&self) -> Option<GeoPoint> {
        self.mouse_position
    }

    /// Returns the timestamp of the last mutation.
    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    /// Returns the vertices to render for `area_id`.
    ///
    /// While the area is edited and the cursor is over the map, the cursor is
    /// appended as a floating vertex and, once there are at least three
    /// vertices, the first vertex is repeated to close the ring. Otherwise the
    /// stored vertices are returned unchanged.
    pub fn get_preview_points(&self, area_id: &str) -> Vec<GeoPoint> {
        let Some(area) = self.get_area(area_id) else {
            return Vec::new();
        };

        let cursor = match self.mouse_position {
            Some(cursor) if area.is_editing && !area.points.is_empty() => cursor,
            _ => return area.points.clone(),
        };

        let mut preview = area.points.clone();
        preview.push(cursor);
        if preview.len() >= 3 {
            preview.push(area.points[0]);
        }
        preview
    }

    // ===== Mutations =====

    /// Appends a new, empty, non-editing area.
    pub fn create(&mut self, name: &str, color: &str) -> Result<SubArea, ValidationError> {
        validate_color(color)?;
        let area = SubArea {
            id: generate_id(ID_PREFIX, now_millis()),
            name: name.to_string(),
            color: color.to_string(),
            points: Vec::new(),
            is_editing: false,
        };
        self.areas.push(area.clone());
        self.commit();
        Ok(area)
    }

    /// Creates an auto-named draft area and makes it the one being edited.
    pub fn start_new_area(&mut self, color: &str) -> Result<SubArea, ValidationError> {
        let name = next_letter_name(self.areas.iter().map(|a| a.name.as_str()));
        let mut area = self.create(&name, color)?;
        self.draft_ids.insert(area.id.clone());
        self.start_editing(&area.id);
        area.is_editing = true;
        log::debug!("Started draft sub-area {:?} ({})", area.name, area.id);
        Ok(area)
    }

    /// Makes `id` the only area being edited. Unknown ids are ignored.
    pub fn start_editing(&mut self, id: &str) {
        if self.get_area(id).is_none() {
            log::debug!("start_editing: no sub-area {:?}", id);
            return;
        }
        self.areas = self
            .areas
            .iter()
            .map(|a| SubArea {
                is_editing: a.id == id,
                ..a.clone()
            })
            .collect();
        self.commit();
    }

    /// Stops editing `id` and finalizes it if it was a draft.
    pub fn stop_editing(&mut self, id: &str) {
        let Some(area) = self.areas.iter_mut().find(|a| a.id == id) else {
            log::debug!("stop_editing: no sub-area {:?}", id);
            return;
        };
        area.is_editing = false;
        self.draft_ids.remove(id);
        self.commit();
    }

    /// Stops editing every area. Draft markers are kept.
    pub fn stop_editing_all(&mut self) {
        for area in &mut self.areas {
            area.is_editing = false;
        }
        self.commit();
    }

    /// Appends a vertex to `area_id`.
    pub fn add_point(&mut self, area_id: &str, point: GeoPoint) {
        self.modify(area_id, |area| area.points.push(point));
    }

    /// Removes the vertex at `index`, shifting later vertices down.
    /// Out-of-range indices are ignored.
    pub fn remove_point(&mut self, area_id: &str, index: usize) {
        self.modify(area_id, |area| {
            if index < area.points.len() {
                area.points.remove(index);
            }
        });
    }

    /// Removes the most recent vertex of `area_id`.
    pub fn remove_last_point(&mut self, area_id: &str) {
        self.modify(area_id, |area| {
            area.points.pop();
        });
    }

    /// Removes every vertex of `area_id`.
    pub fn clear_points(&mut self, area_id: &str) {
        self.modify(area_id, |area| area.points.clear());
    }

    /// Merges `patch` into `id`. Setting `is_editing` to true also stops
    /// editing every other area.
    pub fn update_area(&mut self, id: &str, patch: SubAreaPatch) -> Result<(), ValidationError> {
        if let Some(color) = &patch.color {
            validate_color(color)?;
        }
        if patch.is_editing == Some(true) {
            self.start_editing(id);
        }
        self.modify(id, move |area| {
            if let Some(name) = patch.name {
                area.name = name;
            }
            if let Some(color) = patch.color {
                area.color = color;
            }
            if let Some(points) = patch.points {
                area.points = points;
            }
            if let Some(is_editing) = patch.is_editing {
                area.is_editing = is_editing;
            }
        });
        Ok(())
    }

    /// Changes the color of `id`.
    pub fn update_area_color(&mut self, id: &str, color: &str) -> Result<(), ValidationError> {
        validate_color(color)?;
        let color = color.to_string();
        self.modify(id, move |area| area.color = color);
        Ok(())
    }

    /// Removes `id` and any draft marker for it.
    pub fn delete_area(&mut self, id: &str) {
        self.areas.retain(|a| a.id != id);
        self.draft_ids.remove(id);
        self.commit();
    }

    /// Tracks the cursor for preview rendering. Not persisted.
    pub fn update_mouse_position(&mut self, position: Option<GeoPoint>) {
        self.mouse_position = position;
    }

    /// Installs imported areas. Colliding ids are re-issued, invalid colors
    /// fall back to [`DEFAULT_COLOR`] and, if several areas claim to be
    /// edited, only the first keeps the flag.
    pub fn import_areas(&mut self, areas: Vec<SubArea>, mode: ImportMode) -> usize {
        let mut next = match mode {
            ImportMode::Replace => Vec::with_capacity(areas.len()),
            ImportMode::Add => self.areas.clone(),
        };
        let mut taken: HashSet<String> = next.iter().map(|a| a.id.clone()).collect();

        let count = areas.len();
        for mut area in areas {
            area.id = claim_id(area.id, ID_PREFIX, &mut taken);
            if !is_hex_color(&area.color) {
                log::warn!("Imported sub-area {:?} has invalid color {:?}", area.id, area.color);
                area.color = DEFAULT_COLOR.to_string();
            }
            next.push(area);
        }

        let mut seen_editing = false;
        for area in &mut next {
            if area.is_editing {
                if seen_editing {
                    log::warn!("Clearing editing flag on imported sub-area {:?}", area.id);
                    area.is_editing = false;
                }
                seen_editing = true;
            }
        }

        self.areas = next;
        let areas = &self.areas;
        self.draft_ids.retain(|id| areas.iter().any(|a| &a.id == id));
        self.commit();
        log::info!("Imported {} sub-areas ({})", count, mode);
        count
    }

    /// Removes every area.
    pub fn clear(&mut self) {
        self.areas.clear();
        self.draft_ids.clear();
        self.commit();
    }

    fn modify(&mut self, id: &str, f: impl FnOnce(&mut SubArea)) {
        let Some(index) = self.areas.iter().position(|a| a.id == id) else {
            log::debug!("no sub-area {:?}", id);
            return;
        };
        let mut area = self.areas[index].clone();
        f(&mut area);
        self.areas[index] = area;
        self.commit();
    }

    fn commit(&mut self) {
        self.last_updated = now_millis().max(self.last_updated + 1);
        let serialized: Vec<SerializedSubArea> =
            self.areas.iter().map(SerializedSubArea::from).collect();
        save_value(&self.storage, SUB_AREAS_KEY, &serialized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn registry() -> SubAreaRegistry {
        SubAreaRegistry::open(MemoryStore::shared())
    }

    fn editing_ids(reg: &SubAreaRegistry) -> Vec<String> {
        reg.areas()
            .iter()
            .filter(|a| a.is_editing)
            .map(|a| a.id.clone())
            .collect()
    }

    #[test]
    fn test_create() {
        let mut reg = registry();
        let area = reg.create("North", "#EF4444").unwrap();
        assert!(area.id.starts_with("area_"));
        assert!(area.points.is_empty());
        assert!(!area.is_editing);
        assert!(!reg.is_draft(&area.id));
        assert!(reg.create("Bad", "red").is_err());
        assert_eq!(reg.areas().len(), 1);
    }

    #[test]
    fn test_editing_is_exclusive() {
        let mut reg = registry();
        let a = reg.create("A", "#fff").unwrap();
        let b = reg.create("B", "#fff").unwrap();

        reg.start_editing(&a.id);
        reg.start_editing(&b.id);
        assert_eq!(editing_ids(&reg), vec![b.id.clone()]);

        reg.start_editing("area_missing");
        assert_eq!(editing_ids(&reg), vec![b.id.clone()]);

        reg.update_area(&a.id, SubAreaPatch { is_editing: Some(true), ..Default::default() })
            .unwrap();
        assert_eq!(editing_ids(&reg), vec![a.id.clone()]);

        reg.stop_editing_all();
        assert!(editing_ids(&reg).is_empty());
    }

    #[test]
    fn test_start_new_area_is_draft() {
        let mut reg = registry();
        let existing = reg.create("Area A", "#fff").unwrap();
        reg.start_editing(&existing.id);

        let area = reg.start_new_area("#10B981").unwrap();
        assert_eq!(area.name, "Area B");
        assert!(area.is_editing);
        assert!(reg.is_draft(&area.id));
        assert_eq!(editing_ids(&reg), vec![area.id.clone()]);

        reg.stop_editing(&area.id);
        assert!(!reg.is_draft(&area.id));
        assert!(editing_ids(&reg).is_empty());
    }

    #[test]
    fn test_delete_purges_draft() {
        let mut reg = registry();
        let area = reg.start_new_area("#fff").unwrap();
        reg.delete_area(&area.id);
        assert!(!reg.is_draft(&area.id));
        assert!(reg.areas().is_empty());
    }

    #[test]
    fn test_drafts_are_not_persisted() {
        let storage = MemoryStore::shared();
        let area = {
            let mut reg = SubAreaRegistry::open(storage.clone());
            reg.start_new_area("#fff").unwrap()
        };

        let reopened = SubAreaRegistry::open(storage);
        assert!(reopened.get_area(&area.id).is_some());
        assert!(!reopened.is_draft(&area.id));
    }

    #[test]
    fn test_next_letter_name() {
        assert_eq!(next_letter_name([]), "Area A");
        assert_eq!(next_letter_name(["Area A", "b", " area   C "]), "Area D");
        assert_eq!(next_letter_name(["Area B", "Forest"]), "Area A");
        assert_eq!(next_letter_name(["AreaA", "AB"]), "Area A");

        let letters: Vec<String> = ('A'..='Z').map(|c| format!("Area {}", c)).collect();
        let names = letters.iter().map(String::as_str);
        assert_eq!(next_letter_name(names), "Area 27");
    }

    #[test]
    fn test_point_mutations() {
        let mut reg = registry();
        let area = reg.create("A", "#fff").unwrap();
        for i in 0..4 {
            reg.add_point(&area.id, GeoPoint::new(i as f64, 0.0));
        }

        reg.remove_point(&area.id, 1);
        reg.remove_point(&area.id, 10);
        let lats: Vec<f64> = reg.get_area(&area.id).unwrap().points.iter().map(|p| p.lat()).collect();
        assert_eq!(lats, vec![0.0, 2.0, 3.0]);

        reg.remove_last_point(&area.id);
        assert_eq!(reg.get_area(&area.id).unwrap().points.len(), 2);

        reg.clear_points(&area.id);
        assert!(reg.get_area(&area.id).unwrap().points.is_empty());
    }

    #[test]
    fn test_preview_points() {
        let mut reg = registry();
        let area = reg.create("A", "#fff").unwrap();
        let p0 = GeoPoint::new(0.0, 0.0);
        let p1 = GeoPoint::new(0.0, 1.0);
        let cursor = GeoPoint::new(1.0, 1.0);
        reg.add_point(&area.id, p0);
        reg.update_mouse_position(Some(cursor));

        // Not editing: stored vertices only
        assert_eq!(reg.get_preview_points(&area.id), vec![p0]);

        reg.start_editing(&area.id);
        assert_eq!(reg.get_preview_points(&area.id), vec![p0, cursor]);

        reg.add_point(&area.id, p1);
        assert_eq!(reg.get_preview_points(&area.id), vec![p0, p1, cursor, p0]);

        reg.update_mouse_position(None);
        assert_eq!(reg.get_preview_points(&area.id), vec![p0, p1]);
        assert!(reg.get_preview_points("area_missing").is_empty());
    }

    #[test]
    fn test_last_updated_advances() {
        let mut reg = registry();
        let t0 = reg.last_updated();
        let area = reg.create("A", "#fff").unwrap();
        let t1 = reg.last_updated();
        reg.update_area_color(&area.id, "#000").unwrap();
        let t2 = reg.last_updated();
        assert!(t0 < t1 && t1 < t2);
    }

    #[test]
    fn test_import_keeps_single_editor() {
        let mut reg = registry();
        let existing = reg.create("A", "#fff").unwrap();
        reg.start_editing(&existing.id);

        let imported = vec![SubArea {
            id: existing.id.clone(),
            name: "B".to_string(),
            color: "#000".to_string(),
            points: vec![GeoPoint::new(1.0, 1.0)],
            is_editing: true,
        }];
        assert_eq!(reg.import_areas(imported, ImportMode::Add), 1);

        assert_eq!(reg.areas().len(), 2);
        assert_ne!(reg.areas()[1].id, existing.id);
        assert_eq!(editing_ids(&reg), vec![existing.id.clone()]);
    }

    #[test]
    fn test_import_replaces_invalid_color() {
        let mut reg = registry();
        let imported = vec![
            SubArea {
                id: "area_1".to_string(),
                name: "Bad".to_string(),
                color: "notacolor".to_string(),
                points: vec![GeoPoint::new(1.0, 1.0)],
                is_editing: false,
            },
            SubArea {
                id: "area_2".to_string(),
                name: "Good".to_string(),
                color: "#10B981".to_string(),
                points: Vec::new(),
                is_editing: false,
            },
        ];
        assert_eq!(reg.import_areas(imported, ImportMode::Replace), 2);

        assert_eq!(reg.areas()[0].color, DEFAULT_COLOR);
        assert_eq!(reg.areas()[1].color, "#10B981");
    }
}
