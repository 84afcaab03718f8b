// Document store abstraction
//
// The seam between content logic and whatever hosts the documents.
// `FirestoreClient` talks to the hosted service; `MemoryStore` keeps
// everything in process. Both speak plain JSON fields -- typed value
// encoding is a backend concern.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Field map of a single document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A stored document: its id (last path segment) and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Get/list/set/add/update/delete on named document paths and collections.
///
/// Document paths have an even number of segments (`content/home`),
/// collection paths an odd number (`content/events/items`).
pub trait DocumentStore: Send + Sync {
    /// Read one document. `Ok(None)` when it does not exist.
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Document>, Error>> + Send;

    /// List every document directly inside a collection, ordered by id.
    fn list(&self, collection: &str) -> impl Future<Output = Result<Vec<Document>, Error>> + Send;

    /// Replace (or create) a document with exactly `fields`.
    fn set(&self, path: &str, fields: Fields) -> impl Future<Output = Result<(), Error>> + Send;

    /// Create a document only if it is absent. Returns `true` if it was created.
    fn create(&self, path: &str, fields: Fields)
    -> impl Future<Output = Result<bool, Error>> + Send;

    /// Insert a document with a store-generated id, returning that id.
    fn add(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    /// Merge top-level `fields` onto an existing document.
    ///
    /// Fails with [`Error::NotFound`] when the document does not exist.
    fn update(&self, path: &str, fields: Fields) -> impl Future<Output = Result<(), Error>> + Send;

    /// Delete a document. Deleting an absent document succeeds.
    fn delete(&self, path: &str) -> impl Future<Output = Result<(), Error>> + Send;
}
