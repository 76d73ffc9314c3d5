//! Cache backend collaborators.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::sync::Cache;

use super::error::CacheBackendError;

/// External store contract: atomic get/set of serialized payloads with a
/// per-entry TTL. No transactional guarantee across the two operations is
/// assumed anywhere in this crate.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheBackendError>;

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheBackendError>;
}

#[derive(Debug, Clone)]
struct StoredEntry {
    payload: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, StoredEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache backend with per-entry TTL and LRU-style capacity
/// eviction. The default backend when no external store is wired in.
#[derive(Clone)]
pub struct MemoryBackend {
    entries: Cache<String, StoredEntry>,
}

impl MemoryBackend {
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheBackendError> {
        Ok(self.entries.get(key).map(|entry| entry.payload))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheBackendError> {
        self.entries.insert(
            key.to_string(),
            StoredEntry {
                payload: value,
                ttl,
            },
        );
        Ok(())
    }
}

/// Backend that fails every operation. Exercises the never-throw contract of
/// the cache wrapper in tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingBackend;

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheBackendError> {
        Err(CacheBackendError::Unavailable {
            reason: "failing backend".to_string(),
        })
    }

    async fn set(
        &self,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheBackendError> {
        Err(CacheBackendError::Transport {
            reason: "failing backend".to_string(),
        })
    }
}
