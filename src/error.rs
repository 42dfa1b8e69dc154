//! Error taxonomy for the annotation core.
//!
//! Missing ids are not errors: every mutator treats an unknown id as a no-op.

use thiserror::Error;

/// A record or argument violated a field constraint. No state was changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
    #[error("malformed {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// A backup document could not be applied. No store was mutated.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed backup document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown import mode {0:?} (expected \"replace\" or \"add\")")]
    UnsupportedMode(String),
}

/// The backing key-value store failed to load or flush.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a JSON object: {0}")]
    Serialize(#[from] serde_json::Error),
}
