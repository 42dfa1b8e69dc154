//! Workspace: the three annotation stores over one storage backend.

use crate::storage::{MemoryStore, SharedStorage};
use crate::store::{CoordinateRegistry, MainAreaEditor, SubAreaRegistry};

/// All persisted annotation state of one map.
///
/// The stores are independent; only the backup coordinator reads and writes
/// them as a batch.
pub struct Workspace {
    storage: SharedStorage,
    /// Point markers
    pub coordinates: CoordinateRegistry,
    /// Main boundary polygon
    pub main_area: MainAreaEditor,
    /// Named sub-area polygons
    pub sub_areas: SubAreaRegistry,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("coordinates", &self.coordinates)
            .field("main_area", &self.main_area)
            .field("sub_areas", &self.sub_areas)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Loads every store from `storage`.
    pub fn open(storage: SharedStorage) -> Self {
        Self {
            coordinates: CoordinateRegistry::open(storage.clone()),
            main_area: MainAreaEditor::open(storage.clone()),
            sub_areas: SubAreaRegistry::open(storage.clone()),
            storage,
        }
    }

    /// Creates an empty workspace that is never written to disk.
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::shared())
    }

    /// Returns the storage handle shared by the stores.
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Empties every store. The main area color is kept.
    pub fn clear_all(&mut self) {
        self.coordinates.clear();
        self.main_area.clear();
        self.sub_areas.clear();
        log::info!("Cleared workspace");
    }
}
