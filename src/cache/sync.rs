//! Synchronized Cache Module
//!
//! Locked wrapper around the bounded store used by a cache group.

use tokio::sync::Mutex;

use crate::cache::{ByteStore, ByteView, CacheStats};

struct Inner {
    /// Built lazily on first add, so a cache that only ever misses never
    /// allocates a store
    store: Option<ByteStore<ByteView>>,
    stats: CacheStats,
}

// == Sync Cache ==
/// Wraps a [`ByteStore`] with a single exclusive lock.
///
/// Reads take the same lock as writes: a lookup refreshes recency order,
/// which mutates the store.
pub struct SyncCache {
    inner: Mutex<Inner>,
    max_bytes: u64,
}

impl SyncCache {
    // == Constructor ==
    /// Creates a cache with the given byte budget (zero = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                store: None,
                stats: CacheStats::new(),
            }),
            max_bytes,
        }
    }

    // == Get ==
    /// Looks up a key, returning an independent copy of the stored view.
    ///
    /// Always reports absent before the first `add`.
    pub async fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock().await;
        let found = match inner.store.as_mut() {
            Some(store) => store.get(key).cloned(),
            None => None,
        };
        match found {
            Some(view) => {
                inner.stats.record_hit();
                Some(view)
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Add ==
    /// Stores a view, constructing the underlying store on first use.
    pub async fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock().await;
        let max_bytes = self.max_bytes;
        let store = inner
            .store
            .get_or_insert_with(|| ByteStore::new(max_bytes, None));
        store.add(key.to_string(), value);
    }

    // == Stats ==
    /// Returns a snapshot of the cache's counters.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let mut stats = inner.stats.clone();
        if let Some(store) = inner.store.as_ref() {
            stats.evictions = store.evictions();
            stats.entries = store.len();
            stats.used_bytes = store.used_bytes();
        }
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_before_first_add_is_absent() {
        let cache = SyncCache::new(1024);
        assert!(cache.get("anything").await.is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 0);
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let cache = SyncCache::new(1024);

        cache.add("Tom", ByteView::from("630")).await;
        let view = cache.get("Tom").await.expect("should be cached");

        assert_eq!(view.to_string_lossy(), "630");

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.used_bytes, 6);
    }

    #[tokio::test]
    async fn test_budget_applies_through_wrapper() {
        let cache = SyncCache::new(10);

        cache.add("testKey1", ByteView::from("1235")).await;

        assert!(cache.get("testKey1").await.is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.evictions, 1);
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        use std::sync::Arc;

        let cache = Arc::new(SyncCache::new(0));
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = format!("key-{i}");
                cache.add(&key, ByteView::from("v")).await;
                cache.get(&key).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
    }
}
