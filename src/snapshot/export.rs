use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::info;

use crate::config::SNAPSHOT_FILE_PREFIX;
use crate::snapshot::document::SnapshotDocument;
use crate::snapshot::error::SnapshotError;
use crate::store::Store;

/// What an export wrote, for operator-facing reporting.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub users: usize,
    pub groups: usize,
    pub permissions: usize,
    pub models: usize,
    pub bytes: usize,
}

/// Generated output name when the operator gives none, e.g.
/// `user_data_backup_20260105_140302.json`.
pub fn default_snapshot_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}.json",
        SNAPSHOT_FILE_PREFIX,
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// Serialize the whole store into a timestamped document at `path`.
///
/// Writes exactly one file and never mutates the store. The destination's
/// parent directories are created if missing.
pub fn export_snapshot(store: &Store, path: &Path) -> Result<ExportReport, SnapshotError> {
    let doc = SnapshotDocument::from_store(store, Utc::now())?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let text = serde_json::to_string_pretty(&doc)
        .map_err(|e| SnapshotError::Format(format!("failed to serialize snapshot: {}", e)))?;
    std::fs::write(path, &text)?;

    info!(
        path = %path.display(),
        users = doc.users.len(),
        groups = doc.groups.len(),
        permissions = doc.permissions.len(),
        models = doc.openai_models.len(),
        "Snapshot written"
    );

    Ok(ExportReport {
        path: path.to_path_buf(),
        users: doc.users.len(),
        groups: doc.groups.len(),
        permissions: doc.permissions.len(),
        models: doc.openai_models.len(),
        bytes: text.len(),
    })
}
