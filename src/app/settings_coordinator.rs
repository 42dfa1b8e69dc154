//! Persistence of window preferences through eframe storage.
//!
//! Annotation data is written by the library stores as it changes. Only view
//! preferences and the map viewport go through eframe's storage, once per
//! `save` call.

use crate::app::{AppState, Preferences};
use crate::state::MapViewport;
use serde::{Deserialize, Serialize};

const PREFERENCES_KEY: &str = "mapnote_preferences";
const VIEWPORT_KEY: &str = "mapnote_viewport";

/// Coordinates loading and saving of window preferences.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads preferences, falling back to defaults when absent or unreadable.
    pub fn load_preferences(storage: Option<&dyn eframe::Storage>) -> Preferences {
        Self::try_load_setting(storage, PREFERENCES_KEY).unwrap_or_default()
    }

    /// Loads the last map viewport, falling back to the world view.
    pub fn load_viewport(storage: Option<&dyn eframe::Storage>) -> MapViewport {
        Self::try_load_setting(storage, VIEWPORT_KEY).unwrap_or_default()
    }

    /// Saves preferences and viewport from the application state.
    pub fn save_state(storage: &mut dyn eframe::Storage, state: &AppState) {
        Self::save_setting(storage, PREFERENCES_KEY, &state.preferences);
        Self::save_setting(storage, VIEWPORT_KEY, &state.viewport);
    }

    /// Saves a setting as a JSON string.
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => {
                storage.set_string(key, json_str);
                storage.flush();
            }
            Err(e) => log::warn!("Failed to encode setting {:?}: {}", key, e),
        }
    }

    /// Attempts to load a setting, returning None if not found or invalid.
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json_str = storage?.get_string(key)?;
        match serde_json::from_str(&json_str) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable setting {:?}: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnote::{ImportMode, Workspace};
    use std::collections::HashMap;

    /// Simple mock storage for testing
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                data: HashMap::new(),
            }
        }
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_defaults_without_storage() {
        assert_eq!(SettingsCoordinator::load_preferences(None), Preferences::default());
        assert_eq!(SettingsCoordinator::load_viewport(None).zoom(), MapViewport::new().zoom());
    }

    #[test]
    fn test_save_and_load_state() {
        let mut storage = MockStorage::new();
        let mut prefs = Preferences::default();
        prefs.import_mode = ImportMode::Add;
        prefs.marker_color = "#EF4444".to_string();
        let state = AppState::new(Workspace::in_memory(), prefs.clone(), MapViewport::new());

        SettingsCoordinator::save_state(&mut storage, &state);

        assert_eq!(SettingsCoordinator::load_preferences(Some(&storage)), prefs);
        assert_eq!(
            SettingsCoordinator::load_viewport(Some(&storage)).center(),
            MapViewport::new().center()
        );
    }

    #[test]
    fn test_corrupt_setting_falls_back() {
        let mut storage = MockStorage::new();
        eframe::Storage::set_string(&mut storage, PREFERENCES_KEY, "{not json".to_string());

        assert_eq!(SettingsCoordinator::load_preferences(Some(&storage)), Preferences::default());
        let missing: Option<i32> = SettingsCoordinator::try_load_setting(Some(&storage), "missing");
        assert_eq!(missing, None);
    }
}
