// ── Content cache ──
//
// Holds the last successfully assembled bundle for a fixed freshness
// window. Snapshots are swapped atomically and replaced wholesale; expiry
// is checked lazily on read, nothing runs in the background.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::time::Instant;
use tracing::debug;

use crate::model::ContentBundle;
use crate::reader::FetchReport;

/// A cached fetch result.
#[derive(Debug)]
pub struct Snapshot {
    pub bundle: Arc<ContentBundle>,
    pub report: Arc<FetchReport>,
    pub fetched_at: Instant,
}

/// Time-bounded cache of the last full content read.
///
/// Shared by the reader (fills it) and the writer and reconciler (clear it
/// after every successful write).
#[derive(Debug)]
pub struct ContentCache {
    ttl: Duration,
    slot: ArcSwapOption<Snapshot>,
}

impl ContentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: ArcSwapOption::empty(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached snapshot, if one exists and is younger than the window.
    pub fn fresh(&self) -> Option<Arc<Snapshot>> {
        let snapshot = self.slot.load_full()?;
        let age = snapshot.fetched_at.elapsed();
        if age < self.ttl {
            Some(snapshot)
        } else {
            debug!(age_secs = age.as_secs(), "content cache expired");
            None
        }
    }

    /// Replace the cached snapshot, stamped now.
    pub fn store(&self, bundle: Arc<ContentBundle>, report: Arc<FetchReport>) {
        self.slot.store(Some(Arc::new(Snapshot {
            bundle,
            report,
            fetched_at: Instant::now(),
        })));
    }

    /// Drop the cached snapshot.
    pub fn clear(&self) {
        if self.slot.swap(None).is_some() {
            debug!("content cache cleared");
        }
    }

    /// Whether any snapshot is held, fresh or not.
    pub fn is_populated(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn snapshots_expire_after_the_window() {
        let cache = ContentCache::new(Duration::from_secs(300));
        cache.store(
            Arc::new(ContentBundle::default()),
            Arc::new(FetchReport::default()),
        );

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.fresh().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.fresh().is_none());
        assert!(cache.is_populated());
    }

    #[tokio::test]
    async fn clear_drops_the_snapshot() {
        let cache = ContentCache::default();
        cache.store(
            Arc::new(ContentBundle::default()),
            Arc::new(FetchReport::default()),
        );
        let first = cache.fresh().unwrap();
        assert!(Arc::ptr_eq(&first.bundle, &cache.fresh().unwrap().bundle));

        cache.clear();
        assert!(!cache.is_populated());
        assert!(cache.fresh().is_none());
    }
}
