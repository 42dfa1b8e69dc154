//! Location entry form state.
//!
//! The form is an ordinary value owned by whoever shows it; there is no
//! process-wide instance.

use crate::color::DEFAULT_COLOR;
use crate::error::ValidationError;
use crate::store::{Coordinate, CoordinateRegistry};

/// Fields of the "add location" form.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationForm {
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: String,
    pub color: String,
}

impl Default for LocationForm {
    fn default() -> Self {
        Self {
            address: String::new(),
            lat: None,
            lng: None,
            name: String::new(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl LocationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the position, and the name and color when given non-empty.
    /// Clears the address, which no longer describes the position.
    pub fn fill(&mut self, lat: f64, lng: f64, name: Option<&str>, color: Option<&str>) {
        self.lat = Some(lat);
        self.lng = Some(lng);
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(color) = color.filter(|c| !c.is_empty()) {
            self.color = color.to_string();
        }
        self.address.clear();
    }

    /// Restores every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true once both coordinates are filled.
    pub fn is_complete(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }

    /// Adds the entered location to `registry` and resets the form.
    /// On error the form keeps its contents.
    pub fn submit(&mut self, registry: &mut CoordinateRegistry) -> Result<Coordinate, ValidationError> {
        let lat = self.lat.ok_or(ValidationError::Malformed {
            field: "lat",
            reason: "required".to_string(),
        })?;
        let lng = self.lng.ok_or(ValidationError::Malformed {
            field: "lng",
            reason: "required".to_string(),
        })?;

        let coordinate = registry.add(lat, lng, Some(self.name.as_str()), Some(self.color.as_str()))?;
        self.reset();
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_fill_keeps_name_when_absent() {
        let mut form = LocationForm::new();
        form.name = "Depot".to_string();
        form.address = "Somewhere 1".to_string();

        form.fill(1.0, 2.0, None, Some("#000"));

        assert_eq!(form.name, "Depot");
        assert_eq!(form.color, "#000");
        assert_eq!((form.lat, form.lng), (Some(1.0), Some(2.0)));
        assert!(form.address.is_empty());
    }

    #[test]
    fn test_submit_resets_on_success() {
        let mut registry = CoordinateRegistry::open(MemoryStore::shared());
        let mut form = LocationForm::new();
        form.fill(52.0, 13.0, Some("Station"), None);

        let coordinate = form.submit(&mut registry).unwrap();
        assert_eq!(coordinate.name.as_deref(), Some("Station"));
        assert_eq!(form, LocationForm::default());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_submit_keeps_fields_on_error() {
        let mut registry = CoordinateRegistry::open(MemoryStore::shared());
        let mut form = LocationForm::new();
        assert!(form.submit(&mut registry).is_err());

        form.fill(120.0, 13.0, Some("Nowhere"), None);
        assert_eq!(
            form.submit(&mut registry),
            Err(ValidationError::LatitudeOutOfRange(120.0))
        );
        assert_eq!(form.name, "Nowhere");
        assert!(registry.is_empty());
    }
}
