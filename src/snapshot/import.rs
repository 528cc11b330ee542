use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::{Account, Group, ModelEntry, Permission, ResourceType};
use crate::snapshot::confirm::{ConfirmationProvider, ImportSummary};
use crate::snapshot::document::SnapshotDocument;
use crate::snapshot::error::SnapshotError;
use crate::store::Store;

/// Importer lifecycle. `Committed` and `RolledBack` are terminal; no
/// partially applied state is ever observable on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Validated,
    ConfirmationPending,
    Applying,
    Committed,
    RolledBack,
}

/// Per-entity created/updated counters for one apply pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyStats {
    pub resource_types_created: usize,
    pub permissions_created: usize,
    pub permissions_updated: usize,
    pub groups_created: usize,
    pub groups_updated: usize,
    pub users_created: usize,
    pub users_updated: usize,
    pub models_created: usize,
    pub models_updated: usize,
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub stats: ApplyStats,
}

/// Applies a snapshot document to a store file as a single atomic unit.
///
/// The document is applied to an in-memory working copy; the store file is
/// rewritten (atomic rename) only after every row has resolved, so a failed
/// import leaves the file byte-for-byte untouched.
pub struct Importer {
    store_path: PathBuf,
    state: ImportState,
}

impl Importer {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            state: ImportState::Idle,
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Run one import: validate, confirm, apply, commit.
    ///
    /// Failures before the confirmation gate (unreadable file, bad format)
    /// leave the state at `Idle`; a decline or any apply failure ends in
    /// `RolledBack`.
    pub fn run(
        &mut self,
        snapshot_path: &Path,
        confirm: &mut dyn ConfirmationProvider,
    ) -> Result<ImportReport, SnapshotError> {
        let doc = SnapshotDocument::read(snapshot_path)?;
        self.state = ImportState::Validated;

        let summary = ImportSummary::of(&doc);
        self.state = ImportState::ConfirmationPending;
        if !confirm.confirm(&summary) {
            self.state = ImportState::RolledBack;
            return Err(SnapshotError::Declined);
        }

        self.state = ImportState::Applying;
        match self.apply(&doc) {
            Ok(stats) => {
                self.state = ImportState::Committed;
                Ok(ImportReport { summary, stats })
            }
            Err(e) => {
                self.state = ImportState::RolledBack;
                Err(e)
            }
        }
    }

    fn apply(&self, doc: &SnapshotDocument) -> Result<ApplyStats, SnapshotError> {
        let store = Store::load(&self.store_path)?;
        let (next, stats) = apply_document(&store, doc)?;
        next.persist(&self.store_path)?;
        Ok(stats)
    }
}

/// Apply `doc` on top of `store`, returning the resulting store.
///
/// Apply order satisfies the referential invariants: resource types, then
/// permissions, then groups, then accounts, then model entries. Rows are
/// matched by natural key (codename, name, username) with a stable-id
/// fallback so renames apply to the right row; a match under a different id
/// remaps every forward reference in the document. Import is additive and
/// overwriting only; nothing is deleted.
pub fn apply_document(
    store: &Store,
    doc: &SnapshotDocument,
) -> Result<(Store, ApplyStats), SnapshotError> {
    let mut next = store.clone();
    let mut stats = ApplyStats::default();

    // Resource types referenced by the document are created when missing.
    let mut rt_ids: HashMap<String, u64> = next
        .resource_types
        .iter()
        .map(|r| (r.name.clone(), r.id))
        .collect();
    for row in &doc.permissions {
        if rt_ids.contains_key(&row.resource_type) {
            continue;
        }
        let id = next.next_resource_type_id();
        info!(name = %row.resource_type, id, "Created resource type");
        next.resource_types.push(ResourceType {
            id,
            name: row.resource_type.clone(),
        });
        rt_ids.insert(row.resource_type.clone(), id);
        stats.resource_types_created += 1;
    }

    // Permissions, keyed by resource type + codename. Missing ones are
    // created rather than failed.
    let mut perm_map: HashMap<u64, u64> = HashMap::new();
    for row in &doc.permissions {
        let resource_type_id = rt_ids[&row.resource_type];
        if let Some(existing) = next
            .permissions
            .iter_mut()
            .find(|p| p.resource_type_id == resource_type_id && p.codename == row.codename)
        {
            existing.name = row.name.clone();
            perm_map.insert(row.id, existing.id);
            stats.permissions_updated += 1;
            info!(codename = %row.codename, "Updated permission");
        } else {
            let id = if next.permission_by_id(row.id).is_none() {
                row.id
            } else {
                next.next_permission_id()
            };
            next.permissions.push(Permission {
                id,
                codename: row.codename.clone(),
                name: row.name.clone(),
                resource_type_id,
            });
            perm_map.insert(row.id, id);
            stats.permissions_created += 1;
            info!(codename = %row.codename, id, "Created permission");
        }
    }

    // Groups, with remapped permission links.
    let mut group_map: HashMap<u64, u64> = HashMap::new();
    for group in &doc.groups {
        let permissions = group
            .permissions
            .iter()
            .map(|&id| resolve_permission(&next, &perm_map, id, &group.name))
            .collect::<Result<Vec<_>, _>>()?;

        let matched = next
            .groups
            .iter()
            .position(|g| g.name == group.name)
            .or_else(|| next.groups.iter().position(|g| g.id == group.id));
        match matched {
            Some(pos) => {
                let target = &mut next.groups[pos];
                target.name = group.name.clone();
                target.permissions = permissions;
                group_map.insert(group.id, target.id);
                stats.groups_updated += 1;
                info!(name = %group.name, "Updated group");
            }
            None => {
                // neither name nor id matched, so the document id is free
                let id = group.id;
                next.groups.push(Group {
                    id,
                    name: group.name.clone(),
                    permissions,
                });
                group_map.insert(group.id, id);
                stats.groups_created += 1;
                info!(name = %group.name, id, "Created group");
            }
        }
    }

    // Accounts, credential hashes copied verbatim.
    let mut user_map: HashMap<u64, u64> = HashMap::new();
    for user in &doc.users {
        let groups = user
            .groups
            .iter()
            .map(|&id| {
                group_map
                    .get(&id)
                    .copied()
                    .or_else(|| next.group_by_id(id).map(|g| g.id))
                    .ok_or_else(|| {
                        SnapshotError::Validation(format!(
                            "account '{}' references unknown group id {}",
                            user.username, id
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let user_permissions = user
            .user_permissions
            .iter()
            .map(|&id| resolve_permission(&next, &perm_map, id, &user.username))
            .collect::<Result<Vec<_>, _>>()?;

        let matched = next
            .users
            .iter()
            .position(|u| u.username == user.username)
            .or_else(|| next.users.iter().position(|u| u.id == user.id));
        match matched {
            Some(pos) => {
                let id = next.users[pos].id;
                next.users[pos] = Account {
                    id,
                    groups,
                    user_permissions,
                    ..user.clone()
                };
                user_map.insert(user.id, id);
                stats.users_updated += 1;
                info!(username = %user.username, "Updated account");
            }
            None => {
                // ids are preserved so relationships stay valid after restore
                let id = user.id;
                next.users.push(Account {
                    id,
                    groups,
                    user_permissions,
                    ..user.clone()
                });
                user_map.insert(user.id, id);
                stats.users_created += 1;
                info!(username = %user.username, id, "Created account");
            }
        }
    }

    // Model entries last; they depend on accounts existing.
    for model in &doc.openai_models {
        let assigned_users = model
            .assigned_users
            .iter()
            .map(|&id| {
                user_map
                    .get(&id)
                    .copied()
                    .or_else(|| next.user_by_id(id).map(|u| u.id))
                    .ok_or_else(|| {
                        SnapshotError::Validation(format!(
                            "model '{}' references unknown account id {}",
                            model.name, id
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let matched = next
            .models
            .iter()
            .position(|m| m.name == model.name)
            .or_else(|| next.models.iter().position(|m| m.id == model.id));
        match matched {
            Some(pos) => {
                let id = next.models[pos].id;
                next.models[pos] = ModelEntry {
                    id,
                    assigned_users,
                    ..model.clone()
                };
                stats.models_updated += 1;
                info!(name = %model.name, "Updated model entry");
            }
            None => {
                let id = model.id;
                next.models.push(ModelEntry {
                    id,
                    assigned_users,
                    ..model.clone()
                });
                stats.models_created += 1;
                info!(name = %model.name, id, "Created model entry");
            }
        }
    }

    Ok((next, stats))
}

fn resolve_permission(
    store: &Store,
    perm_map: &HashMap<u64, u64>,
    id: u64,
    owner: &str,
) -> Result<u64, SnapshotError> {
    perm_map
        .get(&id)
        .copied()
        .or_else(|| store.permission_by_id(id).map(|p| p.id))
        .ok_or_else(|| {
            SnapshotError::Validation(format!(
                "'{}' references unknown permission id {}",
                owner, id
            ))
        })
}
