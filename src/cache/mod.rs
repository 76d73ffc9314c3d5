//! Content-addressed result cache.
//!
//! Keys are blake3 digests of the two input texts, namespaced per engine
//! bucket so the lexical, analysis, and aggregate payloads can never collide.
//! The [`CompareCache`] wrapper never fails: backend unavailability,
//! transport errors, and payload-parse failures are logged and degrade to a
//! miss (read) or a no-op (write). Running without a backend is a valid,
//! permanent always-miss mode.

pub mod backend;
pub mod error;

pub use backend::{CacheBackend, MemoryBackend};
pub use error::CacheBackendError;

#[cfg(any(test, feature = "mock"))]
pub use backend::FailingBackend;

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Namespace prefix for every cache key.
pub const CACHE_KEY_PREFIX: &str = "concord:compare";

/// One cache namespace per computing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheBucket {
    /// Lexical-engine score distribution.
    Lexical,
    /// Analysis-engine payload.
    Analysis,
    /// Fully aggregated comparison response.
    Aggregate,
}

impl CacheBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBucket::Lexical => "lexical",
            CacheBucket::Analysis => "analysis",
            CacheBucket::Aggregate => "aggregate",
        }
    }
}

impl std::fmt::Display for CacheBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the cache key for a `(bucket, textA, textB)` triple.
///
/// Order-sensitive: swapping the texts produces a different key even though
/// most metrics are symmetric. The digest input is length-framed
/// (`len(A) || A || "::" || B`) so content containing the separator at a
/// boundary cannot alias a different pair.
pub fn build_cache_key(bucket: CacheBucket, text_a: &str, text_b: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(text_a.len() as u64).to_le_bytes());
    hasher.update(text_a.as_bytes());
    hasher.update(b"::");
    hasher.update(text_b.as_bytes());

    format!(
        "{CACHE_KEY_PREFIX}:{}:{}",
        bucket.as_str(),
        hasher.finalize().to_hex()
    )
}

/// Never-fail cache facade over an optional backend.
#[derive(Debug, Clone)]
pub struct CompareCache<B: CacheBackend> {
    backend: Option<B>,
    ttl: Duration,
}

impl<B: CacheBackend> CompareCache<B> {
    pub fn new(backend: Option<B>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Always-miss cache (no backend configured).
    pub fn disabled() -> Self {
        Self {
            backend: None,
            ttl: Duration::from_secs(crate::constants::DEFAULT_CACHE_TTL_SECS),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the deserialized payload on hit; `None` on miss, backend
    /// failure, or parse failure. Never propagates an error.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;

        let payload = match backend.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(error) => {
                warn!(key, %error, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(error) => {
                warn!(key, %error, "Cached payload failed to parse, treating as miss");
                None
            }
        }
    }

    /// Best-effort write with the default TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, self.ttl).await;
    }

    /// Best-effort write. Serialization or backend failure is logged and
    /// otherwise ignored; it never fails the enclosing request.
    pub async fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key, %error, "Cache payload serialization failed, skipping write");
                return;
            }
        };

        if let Err(error) = backend.set(key, payload, ttl).await {
            warn!(key, %error, "Cache write failed, continuing without caching");
        }
    }
}
