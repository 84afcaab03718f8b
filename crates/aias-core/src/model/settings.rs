use serde::{Deserialize, Serialize};

/// `config/admins`: lower-cased admin emails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminList {
    pub admins: Vec<String>,
}

/// `config/schema`: layout version the store was last migrated to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaMarker {
    pub version: u32,
    /// RFC 3339 timestamp of the migration run.
    pub migrated_at: String,
}
