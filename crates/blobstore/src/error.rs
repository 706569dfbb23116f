//! Error types for store access.

use thiserror::Error;

/// Errors raised while connecting to or operating on an object store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// URL scheme has no matching backend
    #[error("Unsupported store scheme '{scheme}' in URL '{url}'")]
    UnsupportedScheme { scheme: String, url: String },

    /// URL failed to parse or is missing a required component
    #[error("Invalid store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Backend error from the object store client
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// Invalid object key
    #[error("Path error: {0}")]
    Path(#[from] object_store::path::Error),

    /// Local filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
