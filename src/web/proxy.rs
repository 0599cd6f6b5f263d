//! Cache-aside proxy in front of the upstream show search.
//!
//! A request is answered from the shared store when a fresh copy exists;
//! otherwise upstream is queried and the raw body stored with a TTL. Failed
//! fetches are never stored.
//!
//! Concurrent misses for the same normalized query are coalesced: the first
//! caller holds a per-key lock while fetching, and waiters re-check the store
//! once it is released. Coalescing only spans this process; other instances
//! sharing the store may still fetch the same key concurrently.

use crate::store::{CacheStore, StoreError};
use crate::tvmaze::{TvMazeApi, TvMazeError};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// A search response body as stored and returned, plus where it came from.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub body: String,
    pub cache: CacheStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Missing query param: q")]
    InvalidQuery,
    #[error("Upstream error {status}: {reason}")]
    Upstream { status: u16, reason: String },
    #[error("Upstream request failed")]
    Network(#[source] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TvMazeError> for ProxyError {
    fn from(err: TvMazeError) -> Self {
        match err {
            TvMazeError::UpstreamStatus { status, reason } => {
                ProxyError::Upstream { status, reason }
            }
            TvMazeError::Network(e) => ProxyError::Network(e),
        }
    }
}

/// A caller's hold on a key's in-flight lock. Dropping it, including when the
/// request future is abandoned mid-fetch, removes the map entry once no other
/// caller holds it.
struct InflightSlot<'a> {
    map: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> InflightSlot<'a> {
    fn claim(map: &'a DashMap<String, Arc<Mutex<()>>>, key: &'a str) -> Self {
        let lock = map.entry(key.to_owned()).or_default().clone();
        Self { map, key, lock }
    }
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        // Our clone plus the map's own reference.
        self.map
            .remove_if(self.key, |_, slot| Arc::strong_count(slot) == 2);
    }
}

pub struct SearchProxy {
    store: Arc<dyn CacheStore>,
    api: Arc<TvMazeApi>,
    ttl: Duration,
    /// Namespace prefix for cache keys, derived from the upstream host.
    key_prefix: String,
    /// normalized key → lock held by the request fetching it
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl SearchProxy {
    pub fn new(store: Arc<dyn CacheStore>, api: Arc<TvMazeApi>, ttl: Duration) -> Self {
        let base = api.base_url();
        let host = match (base.host_str(), base.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_owned(),
            (None, _) => "upstream".to_owned(),
        };
        Self {
            store,
            api,
            ttl,
            key_prefix: format!("showsearch://{host}/search/shows?q="),
            inflight: DashMap::new(),
        }
    }

    /// Store key for a trimmed query: namespaced and lower-cased, so queries
    /// differing only in case share an entry.
    pub fn cache_key(&self, query: &str) -> String {
        format!("{}{}", self.key_prefix, query.to_lowercase())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn handle(&self, raw_query: &str) -> Result<ProxyResponse, ProxyError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(ProxyError::InvalidQuery);
        }
        let key = self.cache_key(query);

        if let Some(body) = self.cached(&key).await? {
            return Ok(ProxyResponse {
                body,
                cache: CacheStatus::Hit,
            });
        }

        let slot = InflightSlot::claim(&self.inflight, &key);
        let _guard = slot.lock.lock().await;
        self.fetch_and_store(query, &key).await
    }

    async fn cached(&self, key: &str) -> Result<Option<String>, ProxyError> {
        let cached = self.store.get(key).await.inspect_err(|e| {
            error!(error = ?e, key, "cache store read failed");
        })?;
        if cached.is_some() {
            debug!(key, "cache hit");
        }
        Ok(cached)
    }

    /// Runs with the key's lock held.
    async fn fetch_and_store(&self, query: &str, key: &str) -> Result<ProxyResponse, ProxyError> {
        // Another request may have filled the key while this one waited.
        if let Some(body) = self.cached(key).await? {
            return Ok(ProxyResponse {
                body,
                cache: CacheStatus::Hit,
            });
        }

        debug!(key, "cache miss");
        let body = self.api.search_shows_raw(query).await.map_err(|e| {
            warn!(error = ?e, query, "upstream search failed");
            ProxyError::from(e)
        })?;

        self.store
            .set_ex(key, &body, self.ttl)
            .await
            .inspect_err(|e| error!(error = ?e, key, "cache store write failed"))?;

        Ok(ProxyResponse {
            body,
            cache: CacheStatus::Miss,
        })
    }
}
