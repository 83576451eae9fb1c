//! In-memory result cache with TTL using moka
//!
//! Entries older than the TTL are never returned. The cache lives for the process
//! and is shared by every caller holding a clone.

use moka::future::Cache;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

/// TTL cache keyed by `K`
#[derive(Clone)]
pub struct ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
}

impl<K, V> ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
        }
    }

    /// Return the cached value for `key`, or run `compute` and store its output
    ///
    /// `compute` only runs on a miss or after the entry expired.
    pub async fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: Future<Output = V>,
    {
        self.inner.get_with(key, compute).await
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value).await;
    }

    pub async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;
    }

    /// Drop every entry (manual refresh)
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of live entries
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn counted(calls: Arc<AtomicUsize>, value: u32) -> u32 {
        calls.fetch_add(1, Ordering::SeqCst);
        value
    }

    #[tokio::test]
    async fn test_compute_once_within_ttl() {
        let cache: ResultCache<String, u32> = ResultCache::new(Duration::from_secs(300), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache.get_or_compute("PETR4.SA".into(), counted(calls.clone(), 1)).await;
        let second = cache.get_or_compute("PETR4.SA".into(), counted(calls.clone(), 2)).await;

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_forces_recompute() {
        let cache: ResultCache<String, u32> = ResultCache::new(Duration::from_secs(300), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_compute("VALE3.SA".into(), counted(calls.clone(), 1)).await;
        cache.clear();
        let value = cache.get_or_compute("VALE3.SA".into(), counted(calls.clone(), 2)).await;

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache: ResultCache<String, u32> = ResultCache::new(Duration::from_millis(50), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_compute("ITUB4.SA".into(), counted(calls.clone(), 1)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get(&"ITUB4.SA".to_string()).await.is_none());
        let value = cache.get_or_compute("ITUB4.SA".into(), counted(calls.clone(), 2)).await;
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_negative_results_are_cached() {
        let cache: ResultCache<String, Option<u32>> = ResultCache::new(Duration::from_secs(300), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let c = calls.clone();
            let value = cache
                .get_or_compute("XXXX3.SA".into(), async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    None
                })
                .await;
            assert_eq!(value, None);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys() {
        let cache: ResultCache<String, u32> = ResultCache::new(Duration::from_secs(300), 100);
        cache.insert("A".into(), 1).await;
        cache.insert("B".into(), 2).await;

        assert_eq!(cache.get(&"A".to_string()).await, Some(1));
        assert_eq!(cache.len().await, 2);

        cache.invalidate(&"A".to_string()).await;
        assert_eq!(cache.get(&"A".to_string()).await, None);
    }
}
