use serde::{Deserialize, Serialize};

/// An external-service model configuration and the accounts entitled to it.
///
/// Costs are USD per million tokens, kept as exact decimal strings so a
/// re-export reproduces the original text (no float rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: u64,
    pub name: String,
    pub input_cost: String,
    #[serde(default)]
    pub cached_input_cost: Option<String>,
    #[serde(default)]
    pub output_cost: Option<String>,
    /// Ids of accounts allowed to use this model.
    #[serde(default)]
    pub assigned_users: Vec<u64>,
}
