//! Store endpoint configuration.

use serde::{Deserialize, Serialize};

/// One object store endpoint.
///
/// The URL scheme selects the backend: `gs://bucket/prefix` for Google
/// Cloud Storage, `s3://bucket/prefix` for S3-compatible stores, and
/// `file:///dir` for a local directory. Everything after the bucket is
/// the key prefix the handle is scoped to. Credential fields are only
/// consulted by the matching backend and fall back to ambient
/// environment credentials when left empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store URL (e.g., "gs://images-raw/raw" or "file:///var/data/raw")
    pub url: String,

    /// Path to a Google service account JSON key (for gs://)
    #[serde(default)]
    pub service_account: String,

    /// AWS region (for s3://)
    #[serde(default)]
    pub region: String,

    /// AWS access key
    #[serde(default)]
    pub access_key: String,

    /// AWS secret key
    #[serde(default)]
    pub secret_key: String,

    /// Custom S3 endpoint (for MinIO, R2, etc.)
    #[serde(default)]
    pub endpoint: String,
}

impl StoreConfig {
    /// Config carrying only a URL, for local stores and tests.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_account: String::new(),
            region: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            endpoint: String::new(),
        }
    }
}
