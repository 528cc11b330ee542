use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SNAPSHOT_SCHEMA_VERSION;
use crate::models::{Account, Group, ModelEntry};
use crate::snapshot::error::SnapshotError;
use crate::store::Store;

/// Permission row as carried in a snapshot. Unlike the store row it names
/// its owning resource type, so a document can be applied to an environment
/// with different resource-type ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRow {
    pub id: u64,
    pub codename: String,
    pub name: String,
    pub resource_type: String,
}

/// The self-describing snapshot document: the only contract between the
/// exporter and the importer. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub export_date: DateTime<Utc>,
    pub schema_version: String,
    pub users: Vec<Account>,
    pub groups: Vec<Group>,
    pub permissions: Vec<PermissionRow>,
    pub openai_models: Vec<ModelEntry>,
}

impl SnapshotDocument {
    /// Capture the full store as a document stamped with `now`.
    ///
    /// A permission pointing at a resource type the store does not contain
    /// is an integrity bug in the source data and fails the export.
    pub fn from_store(store: &Store, now: DateTime<Utc>) -> Result<Self, SnapshotError> {
        let mut permissions = Vec::with_capacity(store.permissions.len());
        for perm in &store.permissions {
            let resource_type = store
                .resource_type_by_id(perm.resource_type_id)
                .ok_or_else(|| {
                    SnapshotError::Validation(format!(
                        "permission '{}' references unknown resource type id {}",
                        perm.codename, perm.resource_type_id
                    ))
                })?;
            permissions.push(PermissionRow {
                id: perm.id,
                codename: perm.codename.clone(),
                name: perm.name.clone(),
                resource_type: resource_type.name.clone(),
            });
        }

        Ok(Self {
            export_date: now,
            schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
            users: store.users.clone(),
            groups: store.groups.clone(),
            permissions,
            openai_models: store.models.clone(),
        })
    }

    /// Parse a document and validate its schema version tag.
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let doc: SnapshotDocument = serde_json::from_str(text)
            .map_err(|e| SnapshotError::Format(format!("malformed snapshot document: {}", e)))?;
        if doc.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::Format(format!(
                "unsupported schema version '{}' (expected '{}')",
                doc.schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
        }
        Ok(doc)
    }

    /// Read and validate a document from disk.
    pub fn read(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_malformed_json() {
        let err = SnapshotDocument::parse("{oops").unwrap_err();
        assert!(matches!(err, SnapshotError::Format(_)));
    }

    #[test]
    fn parse_rejects_unknown_schema_version() {
        let text = r#"{
            "export_date": "2026-01-05T10:00:00Z",
            "schema_version": "0.banana",
            "users": [], "groups": [], "permissions": [], "openai_models": []
        }"#;
        let err = SnapshotDocument::parse(text).unwrap_err();
        match err {
            SnapshotError::Format(msg) => assert!(msg.contains("0.banana")),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_missing_schema_version() {
        let text = r#"{
            "export_date": "2026-01-05T10:00:00Z",
            "users": [], "groups": [], "permissions": [], "openai_models": []
        }"#;
        assert!(matches!(
            SnapshotDocument::parse(text),
            Err(SnapshotError::Format(_))
        ));
    }

    #[test]
    fn from_store_fails_on_dangling_resource_type() {
        let mut store = Store::default();
        store.permissions.push(crate::models::Permission {
            id: 1,
            codename: "add_account".into(),
            name: "Can add account".into(),
            resource_type_id: 9,
        });
        let err = SnapshotDocument::from_store(&store, Utc::now()).unwrap_err();
        assert!(matches!(err, SnapshotError::Validation(_)));
    }
}
