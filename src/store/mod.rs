//! Shared key-value cache used by the search proxy.
//!
//! The proxy only needs two atomic operations, `GET` and `SET .. EX`, so the
//! store is modelled as a small async trait with a Redis backend for shared
//! deployments and an in-process backend for single instances and tests.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// URL scheme selecting the in-process store.
pub const MEMORY_SCHEME: &str = "memory";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Cache store unavailable: {0}")]
    Connection(String),
    #[error("Cache store command failed")]
    Command(#[from] ::redis::RedisError),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the stored body for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, expiring `ttl` after the write.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}

/// Build the store named by `url`: `memory://` for the in-process store,
/// anything else is handed to the Redis client.
pub fn from_url(url: &str) -> Result<Arc<dyn CacheStore>, StoreError> {
    if url
        .split_once("://")
        .is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case(MEMORY_SCHEME))
    {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(RedisStore::open(url)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_scheme_selects_in_process_store() {
        assert!(from_url("memory://").is_ok());
        assert!(from_url("MEMORY://local").is_ok());
    }

    #[test]
    fn redis_urls_open_lazily() {
        // Nothing listens here; opening must still succeed since connecting is deferred.
        assert!(from_url("redis://127.0.0.1:1").is_ok());
    }

    #[test]
    fn malformed_urls_are_rejected() {
        assert!(from_url("definitely not a url").is_err());
    }
}
