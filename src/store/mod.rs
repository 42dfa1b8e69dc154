//! Persisted annotation stores.
//!
//! Each store exclusively owns its slice of state and writes it through the
//! shared storage handle after every mutation:
//! - Coordinate registry (named, colored point markers)
//! - Main area editor (the single boundary polygon and its draft vertices)
//! - Sub-area registry (named, colored, independently editable polygons)

mod coordinates;
mod main_area;
mod sub_areas;

pub use coordinates::{
    Coordinate, CoordinatePatch, CoordinateRegistry, LocationType, COORDINATES_KEY,
};
pub use main_area::{MainAreaEditor, AREA_EDITOR_KEY, MAIN_AREA_COLOR_KEY};
pub use sub_areas::{
    next_letter_name, SerializedSubArea, SubArea, SubAreaPatch, SubAreaRegistry, SUB_AREAS_KEY,
};

use crate::error::ImportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How imported records combine with a store's existing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Overwrite the collection.
    #[default]
    Replace,
    /// Append to the collection.
    Add,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Add => "add",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(ImportMode::Replace),
            "add" => Ok(ImportMode::Add),
            other => Err(ImportError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Returns `id` unless it is already taken, in which case a fresh id with the
/// same prefix is issued. The returned id is recorded in `taken`.
pub(crate) fn claim_id(
    id: String,
    prefix: &str,
    taken: &mut std::collections::HashSet<String>,
) -> String {
    let id = if id.is_empty() || taken.contains(&id) {
        let fresh = crate::ids::generate_id(prefix, crate::ids::now_millis());
        log::debug!("Re-issuing duplicate id {:?} as {:?}", id, fresh);
        fresh
    } else {
        id
    };
    taken.insert(id.clone());
    id
}
