//! Coordinate registry: a flat, ordered list of named point markers.

use super::{claim_id, ImportMode};
use crate::color::{validate_color, DEFAULT_COLOR};
use crate::error::ValidationError;
use crate::ids::{generate_id, now_millis};
use crate::storage::{load_value, save_value, SharedStorage};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::HashSet;
use std::fmt;

/// Storage key for the coordinate list.
pub const COORDINATES_KEY: &str = "flippermap_coordinates";

const ID_PREFIX: &str = "coord";

/// Facility category a marker can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    Pflegeheim,
    Krankenhaus,
    Rettungswache,
    Arztpraxis,
}

impl LocationType {
    pub const ALL: [LocationType; 4] = [
        LocationType::Pflegeheim,
        LocationType::Krankenhaus,
        LocationType::Rettungswache,
        LocationType::Arztpraxis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Pflegeheim => "Pflegeheim",
            LocationType::Krankenhaus => "Krankenhaus",
            LocationType::Rettungswache => "Rettungswache",
            LocationType::Arztpraxis => "Arztpraxis",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled point marker.
///
/// The on-disk and backup shape is exactly this record in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub created_at: i64,
}

impl Coordinate {
    /// Checks every field constraint of the record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::Malformed {
                field: "id",
                reason: "must not be empty".to_string(),
            });
        }
        validate_lat_lng(self.lat, self.lng)?;
        validate_color(&self.color)?;
        Ok(())
    }

    /// Returns the marker position.
    pub fn position(&self) -> crate::geo::GeoPoint {
        crate::geo::GeoPoint::new(self.lat, self.lng)
    }

    /// Returns the display name, or an empty string when unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Rejects latitudes outside [-90, 90] and longitudes outside [-180, 180].
/// NaN is rejected as well.
pub fn validate_lat_lng(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::LongitudeOutOfRange(lng));
    }
    Ok(())
}

/// Partial update for a [`Coordinate`]. `id` and `created_at` are immutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatePatch {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub location_type: Option<LocationType>,
    pub notes: Option<String>,
    pub images: Option<Vec<String>>,
}

impl CoordinatePatch {
    /// Patch that moves a marker.
    pub fn position(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            ..Self::default()
        }
    }

    fn apply_to(self, base: &Coordinate) -> Coordinate {
        Coordinate {
            id: base.id.clone(),
            lat: self.lat.unwrap_or(base.lat),
            lng: self.lng.unwrap_or(base.lng),
            name: self.name.or_else(|| base.name.clone()),
            color: self.color.unwrap_or_else(|| base.color.clone()),
            location_type: self.location_type.or(base.location_type),
            notes: self.notes.or_else(|| base.notes.clone()),
            images: self.images.or_else(|| base.images.clone()),
            created_at: base.created_at,
        }
    }
}

/// Registry of point markers persisted under [`COORDINATES_KEY`].
pub struct CoordinateRegistry {
    storage: SharedStorage,
    coordinates: Vec<Coordinate>,
}

impl fmt::Debug for CoordinateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinateRegistry")
            .field("coordinates", &self.coordinates)
            .finish_non_exhaustive()
    }
}

impl CoordinateRegistry {
    /// Loads the registry from storage. Stored records that no longer pass
    /// validation are dropped.
    pub fn open(storage: SharedStorage) -> Self {
        let stored: Vec<Coordinate> = load_value(&*storage.borrow(), COORDINATES_KEY);
        let coordinates: Vec<Coordinate> = stored
            .into_iter()
            .filter(|c| match c.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Dropping stored coordinate {:?}: {}", c.id, e);
                    false
                }
            })
            .collect();

        Self {
            storage,
            coordinates,
        }
    }

    // ===== Queries =====

    /// Returns all coordinates in insertion order.
    pub fn list(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn get(&self, id: &str) -> Option<&Coordinate> {
        self.coordinates.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    // ===== Mutations =====

    /// Validates and appends a new coordinate.
    ///
    /// An empty or missing name defaults to `"Location <n>"`; an empty or
    /// missing color defaults to [`DEFAULT_COLOR`].
    pub fn add(
        &mut self,
        lat: f64,
        lng: f64,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<Coordinate, ValidationError> {
        let created_at = now_millis();
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Location {}", self.coordinates.len() + 1),
        };
        let color = match color {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_COLOR.to_string(),
        };

        let coordinate = Coordinate {
            id: generate_id(ID_PREFIX, created_at),
            lat,
            lng,
            name: Some(name),
            color,
            location_type: None,
            notes: None,
            images: None,
            created_at,
        };
        coordinate.validate()?;

        self.coordinates.push(coordinate.clone());
        self.persist();
        Ok(coordinate)
    }

    /// Removes the coordinate with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        match self.coordinates.iter().position(|c| c.id == id) {
            Some(index) => {
                self.coordinates.remove(index);
                self.persist();
            }
            None => log::debug!("remove: no coordinate {:?}", id),
        }
    }

    /// Merges `patch` into the coordinate with `id`, re-validating the result.
    /// Unknown ids are ignored. The record keeps its position in the list.
    pub fn update(&mut self, id: &str, patch: CoordinatePatch) -> Result<(), ValidationError> {
        let Some(index) = self.coordinates.iter().position(|c| c.id == id) else {
            log::debug!("update: no coordinate {:?}", id);
            return Ok(());
        };

        let updated = patch.apply_to(&self.coordinates[index]);
        updated.validate()?;
        self.coordinates[index] = updated;
        self.persist();
        Ok(())
    }

    /// Removes every coordinate.
    pub fn clear(&mut self) {
        self.coordinates.clear();
        self.persist();
    }

    // ===== Import =====

    /// Decodes and validates raw records independently.
    ///
    /// Returns the valid records and the number that were dropped.
    pub fn validate_records(records: Vec<Box<RawValue>>) -> (Vec<Coordinate>, usize) {
        let mut rejected = 0;
        let valid = records
            .into_iter()
            .filter_map(|raw| {
                let result = serde_json::from_str::<Coordinate>(raw.get())
                    .map_err(|e| ValidationError::Malformed {
                        field: "location",
                        reason: e.to_string(),
                    })
                    .and_then(|c| c.validate().map(|()| c));
                match result {
                    Ok(c) => Some(c),
                    Err(e) => {
                        log::warn!("Dropping imported location: {}", e);
                        rejected += 1;
                        None
                    }
                }
            })
            .collect();
        (valid, rejected)
    }

    /// Installs already-validated records, returning how many were taken.
    ///
    /// Ids that collide with a kept record are re-issued.
    pub fn import(&mut self, records: Vec<Coordinate>, mode: ImportMode) -> usize {
        let mut next = match mode {
            ImportMode::Replace => Vec::with_capacity(records.len()),
            ImportMode::Add => self.coordinates.clone(),
        };
        let mut taken: HashSet<String> = next.iter().map(|c| c.id.clone()).collect();

        let count = records.len();
        for mut record in records {
            record.id = claim_id(record.id, ID_PREFIX, &mut taken);
            next.push(record);
        }

        self.coordinates = next;
        self.persist();
        log::info!("Imported {} coordinates ({})", count, mode);
        count
    }

    /// Decodes, validates and installs raw records in one step.
    pub fn import_records(&mut self, records: Vec<Box<RawValue>>, mode: ImportMode) -> usize {
        let (valid, _) = Self::validate_records(records);
        self.import(valid, mode)
    }

    fn persist(&self) {
        save_value(&self.storage, COORDINATES_KEY, &self.coordinates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn registry() -> CoordinateRegistry {
        CoordinateRegistry::open(MemoryStore::shared())
    }

    #[test]
    fn test_add_defaults() {
        let mut reg = registry();
        let first = reg.add(52.52, 13.40, None, None).unwrap();
        let second = reg.add(48.13, 11.58, Some(""), Some("")).unwrap();

        assert!(first.id.starts_with("coord_"));
        assert_eq!(first.name.as_deref(), Some("Location 1"));
        assert_eq!(first.color, DEFAULT_COLOR);
        assert_eq!(second.name.as_deref(), Some("Location 2"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut reg = registry();
        assert_eq!(
            reg.add(91.0, 0.0, None, None),
            Err(ValidationError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            reg.add(0.0, 181.0, None, None),
            Err(ValidationError::LongitudeOutOfRange(181.0))
        );
        assert!(matches!(
            reg.add(0.0, 0.0, None, Some("notacolor")),
            Err(ValidationError::InvalidColor(_))
        ));
        assert!(reg.add(f64::NAN, 0.0, None, None).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let mut reg = registry();
        assert!(reg.add(-90.0, -180.0, None, None).is_ok());
        assert!(reg.add(90.0, 180.0, None, None).is_ok());
    }

    #[test]
    fn test_update_preserves_index_and_identity() {
        let mut reg = registry();
        reg.add(1.0, 1.0, Some("a"), None).unwrap();
        let b = reg.add(2.0, 2.0, Some("b"), None).unwrap();
        reg.add(3.0, 3.0, Some("c"), None).unwrap();

        reg.update(
            &b.id,
            CoordinatePatch {
                name: Some("renamed".to_string()),
                location_type: Some(LocationType::Krankenhaus),
                ..CoordinatePatch::position(10.0, 20.0)
            },
        )
        .unwrap();

        let updated = &reg.list()[1];
        assert_eq!(updated.id, b.id);
        assert_eq!(updated.created_at, b.created_at);
        assert_eq!(updated.name.as_deref(), Some("renamed"));
        assert_eq!((updated.lat, updated.lng), (10.0, 20.0));
        assert_eq!(updated.location_type, Some(LocationType::Krankenhaus));
    }

    #[test]
    fn test_invalid_update_leaves_record() {
        let mut reg = registry();
        let a = reg.add(1.0, 1.0, None, None).unwrap();

        let result = reg.update(&a.id, CoordinatePatch::position(95.0, 1.0));
        assert!(result.is_err());
        assert_eq!(reg.list(), &[a]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut reg = registry();
        reg.add(1.0, 1.0, None, None).unwrap();
        let before = reg.list().to_vec();

        reg.remove("coord_missing");
        assert!(reg.update("coord_missing", CoordinatePatch::position(95.0, 0.0)).is_ok());
        assert_eq!(reg.list(), before.as_slice());
    }

    #[test]
    fn test_mutations_are_persisted() {
        let storage = MemoryStore::shared();
        let mut reg = CoordinateRegistry::open(storage.clone());
        let a = reg.add(1.0, 2.0, Some("persisted"), Some("#abc")).unwrap();

        let reopened = CoordinateRegistry::open(storage);
        assert_eq!(reopened.list(), &[a]);
    }

    #[test]
    fn test_serialized_field_names() {
        let coordinate = Coordinate {
            id: "coord_1_x".to_string(),
            lat: 1.0,
            lng: 2.0,
            name: None,
            color: "#fff".to_string(),
            location_type: Some(LocationType::Arztpraxis),
            notes: None,
            images: None,
            created_at: 7,
        };
        let value = serde_json::to_value(&coordinate).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "coord_1_x",
                "lat": 1.0,
                "lng": 2.0,
                "color": "#fff",
                "locationType": "Arztpraxis",
                "createdAt": 7
            })
        );
    }

    #[test]
    fn test_import_records_drops_invalid() {
        let mut reg = registry();
        let records = [
            r##"{"id": "a", "lat": 1.0, "lng": 1.0, "color": "#fff", "createdAt": 1}"##,
            r##"{"id": "b", "lat": 100.0, "lng": 1.0, "color": "#fff", "createdAt": 1}"##,
            r##"{"id": "c", "lat": 1.0, "lng": 1.0, "createdAt": 1}"##,
            r##"{"id": "d", "lat": 1e400, "lng": 1.0, "color": "#fff", "createdAt": 1}"##,
            r#""not a record""#,
        ]
        .iter()
        .map(|text| RawValue::from_string(text.to_string()).unwrap())
        .collect();
        let imported = reg.import_records(records, ImportMode::Add);
        assert_eq!(imported, 1);
        assert_eq!(reg.list()[0].id, "a");
    }

    #[test]
    fn test_add_import_reissues_colliding_ids() {
        let mut reg = registry();
        let existing = reg.add(1.0, 1.0, None, None).unwrap();
        let mut clash = existing.clone();
        clash.name = Some("clash".to_string());

        assert_eq!(reg.import(vec![clash], ImportMode::Add), 1);
        assert_eq!(reg.len(), 2);
        assert_ne!(reg.list()[0].id, reg.list()[1].id);
        assert_eq!(reg.list()[0], existing);
    }
}
