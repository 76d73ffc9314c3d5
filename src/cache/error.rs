use thiserror::Error;

#[derive(Debug, Error)]
/// Errors a cache backend may surface. The [`crate::cache::CompareCache`]
/// wrapper swallows all of them: reads degrade to a miss, writes to a no-op.
pub enum CacheBackendError {
    /// Backend unreachable or refused the operation.
    #[error("cache backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// Transport-level failure mid-operation.
    #[error("cache transport error: {reason}")]
    Transport { reason: String },
}
