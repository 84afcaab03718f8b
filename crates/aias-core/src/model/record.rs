use aias_api::Document;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// A stored entity tagged with its store-assigned id.
///
/// Serializes as `{"id": .., ...fields}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: String,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Record<T> {
    pub fn new(id: impl Into<String>, item: T) -> Self {
        Self {
            id: id.into(),
            item,
        }
    }
}

impl<T: DeserializeOwned> Record<T> {
    /// Decode a listed document into a typed record.
    pub fn from_document(doc: Document) -> Result<Self, CoreError> {
        let item = serde_json::from_value(Value::Object(doc.fields)).map_err(|e| {
            CoreError::Decode {
                message: format!("record {}: {e}", doc.id),
            }
        })?;
        Ok(Self { id: doc.id, item })
    }
}

impl<T> std::ops::Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}
