// ── ContentService ──
//
// One store and one content cache, shared by the reader, the writer and
// the reconciler handed out from here. Writes through any handle clear
// the cache every reader sees.

use std::sync::Arc;
use std::time::Duration;

use aias_api::{DocumentStore, FirestoreClient};
use tracing::info;

use crate::cache::ContentCache;
use crate::config::StoreConfig;
use crate::error::CoreError;
use crate::reader::ContentReader;
use crate::reconciler::StructureReconciler;
use crate::search::{SearchHit, search_bundle};
use crate::writer::ContentWriter;

/// Entry point for page renderers and admin tooling.
pub struct ContentService<S> {
    store: Arc<S>,
    cache: Arc<ContentCache>,
}

impl<S> Clone for ContentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl ContentService<FirestoreClient> {
    /// Build a service backed by the hosted (or emulated) Firestore.
    pub fn connect(config: &StoreConfig) -> Result<Self, CoreError> {
        let client = FirestoreClient::new(&config.firestore_config(), &config.transport())?;
        info!(
            project = %config.project_id,
            database = %config.database,
            emulator = config.base_url.is_some(),
            "document store client ready"
        );
        Ok(Self::with_store(client, config.cache_ttl))
    }
}

impl<S: DocumentStore> ContentService<S> {
    pub fn with_store(store: S, cache_ttl: Duration) -> Self {
        Self::from_shared(Arc::new(store), cache_ttl)
    }

    /// Wrap a store the caller keeps a handle to (tests inspect it).
    pub fn from_shared(store: Arc<S>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: Arc::new(ContentCache::new(cache_ttl)),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    pub fn reader(&self) -> ContentReader<S> {
        ContentReader::new(Arc::clone(&self.store), Arc::clone(&self.cache))
    }

    pub fn writer(&self) -> ContentWriter<S> {
        ContentWriter::new(Arc::clone(&self.store), Arc::clone(&self.cache))
    }

    pub fn reconciler(&self) -> StructureReconciler<S> {
        StructureReconciler::new(Arc::clone(&self.store), Arc::clone(&self.cache))
    }

    /// Search the current bundle, fetching it if the cache is stale.
    pub async fn search(&self, query: &str, force_refresh: bool) -> Result<Vec<SearchHit>, CoreError> {
        let fetched = self.reader().fetch(force_refresh).await?;
        Ok(search_bundle(&fetched.bundle, query))
    }
}
