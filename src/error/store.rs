//! Durable key/value store failures.

/// Failure of a [`crate::traits::KeyValueStore`] operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot be reached at all (no data directory, disabled storage).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write because it is full.
    #[error("store quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },

    /// Underlying I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry (or the store file itself) is not valid JSON.
    #[error("malformed stored data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Any other failure reported by a store implementation.
    #[error("store error: {0}")]
    Other(String),
}
