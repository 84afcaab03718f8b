// Schema versions and migrations
//
// Version 1 kept events and library resources in flat top-level
// collections and embedded courses and articles as arrays inside their
// singleton documents. Version 2 moves every entity into a sub-collection
// under its singleton. Migration copies records keyed by their source id,
// so replaying a partially applied run never duplicates anything.

use aias_api::{Document, Fields};
use serde_json::Value;

use super::paths;

/// Current layout version, recorded in `config/schema` after migration.
pub const SCHEMA_VERSION: u32 = 2;

/// Where a deprecated record set lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacySource {
    /// A flat collection of documents.
    Collection(&'static str),
    /// An array field embedded in a singleton document.
    EmbeddedArray {
        document: &'static str,
        field: &'static str,
    },
}

impl std::fmt::Display for LegacySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection(path) => f.write_str(path),
            Self::EmbeddedArray { document, field } => write!(f, "{document}.{field}"),
        }
    }
}

/// One copy from a deprecated location into a current sub-collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStep {
    pub source: LegacySource,
    pub destination: &'static str,
}

/// Steps that bring a version 1 store to version 2.
pub const V1_TO_V2: [MigrationStep; 4] = [
    MigrationStep {
        source: LegacySource::Collection(paths::LEGACY_EVENTS),
        destination: paths::EVENT_ITEMS,
    },
    MigrationStep {
        source: LegacySource::Collection(paths::LEGACY_LIBRARY),
        destination: paths::LIBRARY_ITEMS,
    },
    MigrationStep {
        source: LegacySource::EmbeddedArray {
            document: paths::MAGAZINE,
            field: "articles",
        },
        destination: paths::ARTICLES,
    },
    MigrationStep {
        source: LegacySource::EmbeddedArray {
            document: paths::EDUCATION,
            field: "courses",
        },
        destination: paths::COURSES,
    },
];

/// Steps needed to move a store from `from` to [`SCHEMA_VERSION`].
pub fn steps_from(from: u32) -> &'static [MigrationStep] {
    if from < SCHEMA_VERSION {
        &V1_TO_V2
    } else {
        &[]
    }
}

/// A record lifted out of a legacy location, ready to be copied.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    pub id: String,
    pub fields: Fields,
}

impl From<Document> for LegacyRecord {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            fields: doc.fields,
        }
    }
}

/// Lift the entries of an embedded array.
///
/// An entry keeps its own `id` when it has a usable one, otherwise it is
/// keyed `legacy-<index>`. The `id` field itself is not copied. Entries
/// that are not objects are returned as errors by index.
pub fn embedded_records(entries: &[Value]) -> (Vec<LegacyRecord>, Vec<usize>) {
    let mut records = Vec::new();
    let mut rejected = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(fields) = entry else {
            rejected.push(index);
            continue;
        };
        let mut fields = fields.clone();
        let id = match fields.remove("id") {
            Some(Value::String(id)) if is_usable_id(&id) => id,
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("legacy-{index}"),
        };
        records.push(LegacyRecord { id, fields });
    }
    (records, rejected)
}

/// `__name__`-style ids are reserved by the store.
fn is_usable_id(id: &str) -> bool {
    let reserved = id.len() > 4 && id.starts_with("__") && id.ends_with("__");
    !id.trim().is_empty() && !id.contains('/') && !matches!(id, "." | "..") && !reserved
}
