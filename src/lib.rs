pub mod geo;
pub mod color;
pub mod error;
pub mod ids;
pub mod storage;
pub mod store;
pub mod form;
pub mod workspace;
pub mod backup;

// Export geometry
pub use geo::{GeoPoint, SerializedPoint, WORLD_RING};

// Export errors
pub use error::{ImportError, StorageError, ValidationError};

// Export persistence
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStorage};

// Export stores
pub use store::{
    Coordinate, CoordinatePatch, CoordinateRegistry, ImportMode, LocationType,
    MainAreaEditor, SubArea, SubAreaPatch, SubAreaRegistry,
};

// Export workspace and backup support
pub use form::LocationForm;
pub use workspace::Workspace;
pub use backup::{
    BackupCoordinator, BackupDocument, ImportOutcome, ImportSummary,
    read_backup_file, write_backup_file,
};
