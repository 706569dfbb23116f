//! Error types for the pipeline stages.

use thiserror::Error;

/// Errors raised by configuration loading and the two pipeline stages.
///
/// Undecodable images are deliberately not represented here; the
/// preprocessing stage skips those per object instead of failing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration is missing, unreadable, or fails validation
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration YAML does not parse into the expected shape
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// Store access failed
    #[error("Store error: {0}")]
    Store(#[from] blobstore::StoreError),

    /// Local filesystem error while mirroring
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A resize worker panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
