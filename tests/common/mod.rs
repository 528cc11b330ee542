use chrono::{TimeZone, Utc};
use snapback::models::{Account, Group, ModelEntry, Permission, ResourceType};
use snapback::store::Store;

pub fn account(id: u64, username: &str) -> Account {
    Account {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: format!("pbkdf2:sha256:100000$salt{}$deadbeef", id),
        first_name: String::new(),
        last_name: String::new(),
        is_active: true,
        is_staff: false,
        is_superuser: false,
        date_joined: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        last_login: Some(Utc.with_ymd_and_hms(2026, 1, 4, 18, 30, 0).unwrap()),
        groups: vec![],
        user_permissions: vec![],
    }
}

/// Two accounts, one group, three permissions, one model entry.
pub fn sample_store() -> Store {
    let mut alice = account(1, "alice");
    alice.is_staff = true;
    alice.is_superuser = true;
    alice.groups = vec![1];
    alice.user_permissions = vec![3];
    let mut bob = account(2, "bob");
    bob.groups = vec![1];

    Store {
        resource_types: vec![
            ResourceType {
                id: 1,
                name: "account".into(),
            },
            ResourceType {
                id: 2,
                name: "openai_model".into(),
            },
        ],
        permissions: vec![
            Permission {
                id: 1,
                codename: "add_account".into(),
                name: "Can add account".into(),
                resource_type_id: 1,
            },
            Permission {
                id: 2,
                codename: "change_account".into(),
                name: "Can change account".into(),
                resource_type_id: 1,
            },
            Permission {
                id: 3,
                codename: "use_model".into(),
                name: "Can use model".into(),
                resource_type_id: 2,
            },
        ],
        groups: vec![Group {
            id: 1,
            name: "editors".into(),
            permissions: vec![1, 2],
        }],
        users: vec![alice, bob],
        models: vec![ModelEntry {
            id: 1,
            name: "gpt-4o".into(),
            input_cost: "2.50".into(),
            cached_input_cost: Some("1.25".into()),
            output_cost: Some("10.00".into()),
            assigned_users: vec![1, 2],
        }],
    }
}
