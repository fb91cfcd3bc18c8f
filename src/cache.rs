//! Keyed TTL cache used by the adaptor layer.
//!
//! A [`TtlCache`] maps string keys (entity id plus query parameters) to values
//! that expire after a fixed time-to-live. It is unbounded in entry count and
//! scoped to the process lifetime; mutating operations in the adaptor
//! invalidate affected keys explicitly. This is a low-volume console cache,
//! not an eviction engine.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::trace;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= self.ttl
    }
}

/// Map from string key to a value with a per-entry time-to-live.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache whose inserts default to `default_ttl`.
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    ///
    /// Expired entries are dropped on access.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but expired; drop it under the write lock.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            trace!(key, "dropping expired cache entry");
            entries.remove(key);
        }
        None
    }

    /// Stores `value` under `key` with the default time-to-live.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores `value` under `key` with an explicit time-to-live.
    pub async fn insert_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.into(),
            Entry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Removes one key.
    pub async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Removes every key starting with `prefix`.
    ///
    /// Cache keys are structured as `"{kind}:{container_id}:..."`, so a
    /// mutation on one container invalidates with prefix `"{kind}:{id}:"`.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        trace!(prefix, dropped = before - entries.len(), "invalidated cache prefix");
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Number of entries currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache currently holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_value_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("overview:1", 42_i64).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("overview:1").await, Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_misses_after_ttl_elapses() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("overview:1", 42_i64).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get("overview:1").await, None);
        // The expired entry is dropped, not retained.
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_only_drops_matching_keys() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("metrics:1:24h", 1_i64).await;
        cache.insert("metrics:1:7d", 2_i64).await;
        cache.insert("metrics:2:24h", 3_i64).await;

        cache.invalidate_prefix("metrics:1").await;

        assert_eq!(cache.get("metrics:1:24h").await, None);
        assert_eq!(cache.get("metrics:1:7d").await, None);
        assert_eq!(cache.get("metrics:2:24h").await, Some(3));
    }

    #[tokio::test]
    async fn test_clear_empties_the_cache() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1_i64).await;
        cache.insert("b", 2_i64).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_with_ttl_overrides_default() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache
            .insert_with_ttl("short", 1_i64, Duration::from_secs(5))
            .await;

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("short").await, None);
    }
}
