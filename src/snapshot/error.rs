/// Error types for snapshot export and import
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while producing or applying a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot file unreadable or destination unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document or unrecognized schema version tag
    #[error("format error: {0}")]
    Format(String),

    /// A reference could not be resolved even after creation attempts;
    /// the import was rolled back
    #[error("validation error: {0}")]
    Validation(String),

    /// The operator declined the confirmation prompt
    #[error("import declined; no changes were made")]
    Declined,

    /// The target store could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),
}
