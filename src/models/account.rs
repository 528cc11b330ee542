use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account, carried bit-for-bit through export and import.
///
/// `password` holds the stored credential hash verbatim; snapshots never
/// re-hash or re-salt it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    /// Ids of groups this account belongs to.
    #[serde(default)]
    pub groups: Vec<u64>,
    /// Ids of permissions granted directly, outside any group.
    #[serde(default)]
    pub user_permissions: Vec<u64>,
}
