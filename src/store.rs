use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Account, Group, ModelEntry, Permission, ResourceType};

/// Errors raised while reading or writing the store file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The persisted user-account domain, backed by a single JSON file.
///
/// All mutation happens in memory; [`Store::persist`] writes the whole
/// store back in one atomic rename, so readers never observe a partially
/// written file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub resource_types: Vec<ResourceType>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub users: Vec<Account>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

impl Store {
    /// Load the store from `path`. A missing file is an empty store, so the
    /// tool works on a fresh environment without an init step.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the store to `path` atomically: serialize into a temp file in
    /// the same directory, then rename it over the target.
    pub fn persist(&self, path: &Path) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let text = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    pub fn user_by_id(&self, id: u64) -> Option<&Account> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&Account> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn group_by_id(&self, id: u64) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn permission_by_id(&self, id: u64) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.id == id)
    }

    /// Look up a permission by its natural key: owning resource type plus
    /// codename.
    pub fn permission_by_key(&self, resource_type_id: u64, codename: &str) -> Option<&Permission> {
        self.permissions
            .iter()
            .find(|p| p.resource_type_id == resource_type_id && p.codename == codename)
    }

    pub fn resource_type_by_id(&self, id: u64) -> Option<&ResourceType> {
        self.resource_types.iter().find(|r| r.id == id)
    }

    pub fn resource_type_by_name(&self, name: &str) -> Option<&ResourceType> {
        self.resource_types.iter().find(|r| r.name == name)
    }

    pub fn model_by_name(&self, name: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn next_resource_type_id(&self) -> u64 {
        next_id(self.resource_types.iter().map(|r| r.id))
    }

    pub fn next_permission_id(&self) -> u64 {
        next_id(self.permissions.iter().map(|p| p.id))
    }

    pub fn next_group_id(&self) -> u64 {
        next_id(self.groups.iter().map(|g| g.id))
    }

    pub fn next_user_id(&self) -> u64 {
        next_id(self.users.iter().map(|u| u.id))
    }

    pub fn next_model_id(&self) -> u64 {
        next_id(self.models.iter().map(|m| m.id))
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |m| m + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_store() -> Store {
        Store {
            resource_types: vec![ResourceType {
                id: 1,
                name: "account".into(),
            }],
            permissions: vec![Permission {
                id: 7,
                codename: "add_account".into(),
                name: "Can add account".into(),
                resource_type_id: 1,
            }],
            groups: vec![Group {
                id: 3,
                name: "editors".into(),
                permissions: vec![7],
            }],
            users: vec![Account {
                id: 42,
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "pbkdf2:sha256:100000$ab$cd".into(),
                first_name: String::new(),
                last_name: String::new(),
                is_active: true,
                is_staff: false,
                is_superuser: false,
                date_joined: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                last_login: None,
                groups: vec![3],
                user_permissions: vec![],
            }],
            models: vec![],
        }
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = sample_store();
        store.persist(&path).unwrap();
        let loaded = Store::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn load_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(store, Store::default());
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Store::load(&path), Err(StoreError::Parse(_))));
    }

    #[test]
    fn fresh_ids_come_after_the_highest_existing_id() {
        let store = sample_store();
        assert_eq!(store.next_user_id(), 43);
        assert_eq!(store.next_permission_id(), 8);
        assert_eq!(Store::default().next_group_id(), 1);
    }

    #[test]
    fn natural_key_lookups() {
        let store = sample_store();
        assert!(store.permission_by_key(1, "add_account").is_some());
        assert!(store.permission_by_key(2, "add_account").is_none());
        assert!(store.user_by_username("alice").is_some());
        assert!(store.group_by_name("editors").is_some());
    }
}
