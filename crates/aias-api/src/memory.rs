// In-process document store
//
// Keeps documents in a `DashMap` keyed by full path. Used for local
// previews without network access and as the backend of the core
// crate's tests: it counts reads and writes, and individual paths can be
// told to fail.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::{DashMap, DashSet};
use tracing::debug;
use uuid::Uuid;

use crate::error::Error;
use crate::path;
use crate::store::{Document, DocumentStore, Fields};

/// A `DocumentStore` that lives entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: DashMap<String, Fields>,
    failing: DashSet<String>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document directly, without counting it as a write.
    pub fn seed(&self, path: &str, fields: Fields) {
        self.docs.insert(path.to_owned(), fields);
    }

    /// Current fields of a document, if present.
    pub fn fields(&self, path: &str) -> Option<Fields> {
        self.docs.get(path).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.docs.contains_key(path)
    }

    /// Number of documents directly inside `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.docs
            .iter()
            .filter(|entry| path::is_child_of(entry.key(), collection))
            .count()
    }

    /// Make every operation addressing exactly `path` fail with [`Error::Injected`].
    pub fn fail_on(&self, path: &str) {
        self.failing.insert(path.to_owned());
    }

    pub fn clear_failures(&self) {
        self.failing.clear();
    }

    /// Number of `get`/`list` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of mutating calls (`set`/`create`/`add`/`update`/`delete`) served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Total remote-equivalent calls.
    pub fn call_count(&self) -> usize {
        self.read_count() + self.write_count()
    }

    pub fn reset_counters(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }

    fn check(&self, path: &str) -> Result<(), Error> {
        if self.failing.contains(path) {
            return Err(Error::Injected {
                path: path.to_owned(),
            });
        }
        Ok(())
    }

    fn read(&self, path: &str) -> Result<(), Error> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.check(path)
    }

    fn write(&self, path: &str) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.check(path)
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Document>, Error> {
        path::validate_document(path)?;
        self.read(path)?;
        let (_, id) = path::split_document(path)?;
        Ok(self.docs.get(path).map(|entry| Document {
            id: id.to_owned(),
            fields: entry.value().clone(),
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, Error> {
        path::validate_collection(collection)?;
        self.read(collection)?;
        let mut docs: Vec<Document> = self
            .docs
            .iter()
            .filter(|entry| path::is_child_of(entry.key(), collection))
            .filter_map(|entry| {
                entry.key().rsplit_once('/').map(|(_, id)| Document {
                    id: id.to_owned(),
                    fields: entry.value().clone(),
                })
            })
            .collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }

    async fn set(&self, path: &str, fields: Fields) -> Result<(), Error> {
        path::validate_document(path)?;
        self.write(path)?;
        self.docs.insert(path.to_owned(), fields);
        debug!(path, "memory set");
        Ok(())
    }

    async fn create(&self, path: &str, fields: Fields) -> Result<bool, Error> {
        path::validate_document(path)?;
        self.write(path)?;
        let created = match self.docs.entry(path.to_owned()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(fields);
                true
            }
        };
        debug!(path, created, "memory create");
        Ok(created)
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, Error> {
        path::validate_collection(collection)?;
        self.write(collection)?;
        let id = Uuid::new_v4().simple().to_string();
        self.docs.insert(format!("{collection}/{id}"), fields);
        debug!(collection, %id, "memory add");
        Ok(id)
    }

    async fn update(&self, path: &str, fields: Fields) -> Result<(), Error> {
        path::validate_document(path)?;
        self.write(path)?;
        let Some(mut existing) = self.docs.get_mut(path) else {
            return Err(Error::NotFound {
                path: path.to_owned(),
            });
        };
        existing.extend(fields);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        path::validate_document(path)?;
        self.write(path)?;
        self.docs.remove(path);
        Ok(())
    }
}
