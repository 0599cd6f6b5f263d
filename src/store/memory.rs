//! In-process TTL store backed by a `DashMap`.

use super::{CacheStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Every this many writes, expired entries that were never read again are swept.
const SWEEP_EVERY: usize = 64;

#[derive(Clone, Default)]
pub struct MemoryStore {
    /// key → (expires_at, body)
    entries: Arc<DashMap<String, (Instant, Arc<String>)>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, (expires_at, _)| *expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "swept expired cache entries");
        }
        removed
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(entry) = self.entries.get(key) {
            let (expires_at, ref body) = *entry;
            if Instant::now() < expires_at {
                return Ok(Some(body.as_str().to_owned()));
            }
        }
        // Expired entries are dropped on the read that observes them.
        if self
            .entries
            .remove_if(key, |_, (expires_at, _)| Instant::now() >= *expires_at)
            .is_some()
        {
            trace!(key, "evicted expired cache entry");
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.entries.insert(
            key.to_owned(),
            (Instant::now() + ttl, Arc::new(value.to_owned())),
        );
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.purge_expired();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_value_until_expiry() {
        let store = MemoryStore::new();
        store
            .set_ex("k", "[]", Duration::from_millis(40))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[]"));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn overwrite_replaces_body_and_ttl() {
        let store = MemoryStore::new();
        store.set_ex("k", "old", Duration::from_secs(5)).await.unwrap();
        store.set_ex("k", "new", Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn writes_sweep_expired_entries_that_are_never_read() {
        let store = MemoryStore::new();
        for i in 0..SWEEP_EVERY {
            store
                .set_ex(&format!("stale-{i}"), "[]", Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        for i in 0..SWEEP_EVERY {
            store
                .set_ex(&format!("fresh-{i}"), "[]", Duration::from_secs(5))
                .await
                .unwrap();
        }
        assert_eq!(store.len(), SWEEP_EVERY);
        assert_eq!(store.get("fresh-0").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn purge_keeps_live_entries() {
        let store = MemoryStore::new();
        store.set_ex("old", "[]", Duration::from_millis(1)).await.unwrap();
        store.set_ex("live", "[]", Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("live").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent").await.unwrap(), None);
    }
}
