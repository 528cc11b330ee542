use serde::{Deserialize, Serialize};

/// A kind of resource that owns permissions (e.g. `account`, `group`,
/// `openai_model`). Permissions are unique per resource type + codename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: u64,
    pub name: String,
}

/// Fine-grained grant attached to groups or directly to accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: u64,
    /// Machine name, unique within its resource type (e.g. `add_account`).
    pub codename: String,
    /// Human-readable label (e.g. "Can add account").
    pub name: String,
    pub resource_type_id: u64,
}
