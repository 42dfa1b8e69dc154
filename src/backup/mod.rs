//! Whole-workspace backup: document format, export/import coordination and
//! backup file I/O.

mod coordinator;
mod document;
mod file;

pub use coordinator::{BackupCoordinator, ImportOutcome, ImportSummary};
pub use document::{BackupDocument, MainAreaSection};
pub use file::{read_backup_file, write_backup_file, DEFAULT_BACKUP_FILE_NAME};
