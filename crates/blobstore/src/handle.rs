//! Connected object store handles.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use diagnostics::debug;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectMeta, ObjectStore, PutOptions};
use url::Url;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Which backend a handle talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    GoogleCloud,
    AmazonS3,
    Local,
    Memory,
}

impl StoreKind {
    /// Whether uploads may carry object attributes such as a content
    /// type. `LocalFileSystem` rejects non-empty attributes.
    pub fn supports_attributes(self) -> bool {
        !matches!(self, StoreKind::Local)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::GoogleCloud => "gcs",
            StoreKind::AmazonS3 => "s3",
            StoreKind::Local => "local",
            StoreKind::Memory => "memory",
        }
    }
}

/// A connected object store scoped to a key prefix.
///
/// Cloning is cheap and clones share the underlying client, so a handle
/// can be handed to each worker task of a parallel stage.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    store: Arc<dyn ObjectStore>,
    prefix: Path,
    kind: StoreKind,
    label: String,
}

impl StoreHandle {
    /// Connect to the store named by `config.url`.
    ///
    /// Cloud backends build a client for the URL's bucket, scoped to the
    /// remainder of the URL path. Credentials come from the config when
    /// set and from the process environment otherwise. `file://` URLs
    /// open a local directory rooted at the URL path, creating it if
    /// missing.
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let url = Url::parse(&config.url).map_err(|e| StoreError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        let handle = match url.scheme() {
            "gs" => {
                let bucket = host_bucket(&url, &config.url)?;
                let mut builder = object_store::gcp::GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket);
                if !config.service_account.is_empty() {
                    builder = builder.with_service_account_path(&config.service_account);
                }
                Self {
                    store: Arc::new(builder.build()?),
                    prefix: url_prefix(&url),
                    kind: StoreKind::GoogleCloud,
                    label: config.url.clone(),
                }
            }
            "s3" => {
                let bucket = host_bucket(&url, &config.url)?;
                let mut builder =
                    object_store::aws::AmazonS3Builder::from_env().with_bucket_name(bucket);
                if !config.region.is_empty() {
                    builder = builder.with_region(&config.region);
                }
                if !config.access_key.is_empty() {
                    builder = builder.with_access_key_id(&config.access_key);
                }
                if !config.secret_key.is_empty() {
                    builder = builder.with_secret_access_key(&config.secret_key);
                }
                if !config.endpoint.is_empty() {
                    builder = builder.with_endpoint(&config.endpoint);
                }
                Self {
                    store: Arc::new(builder.build()?),
                    prefix: url_prefix(&url),
                    kind: StoreKind::AmazonS3,
                    label: config.url.clone(),
                }
            }
            "file" => {
                let dir = url.to_file_path().map_err(|_| StoreError::InvalidUrl {
                    url: config.url.clone(),
                    reason: "not a usable local path".to_string(),
                })?;
                std::fs::create_dir_all(&dir)?;
                Self {
                    store: Arc::new(object_store::local::LocalFileSystem::new_with_prefix(&dir)?),
                    prefix: Path::default(),
                    kind: StoreKind::Local,
                    label: config.url.clone(),
                }
            }
            other => {
                return Err(StoreError::UnsupportedScheme {
                    scheme: other.to_string(),
                    url: config.url.clone(),
                });
            }
        };

        let label = &handle.label;
        let kind = handle.kind.as_str();
        debug!("Connected {kind} store at {label}", kind: kind, label: label);
        Ok(handle)
    }

    /// In-process store for tests and dry runs.
    pub fn in_memory(prefix: &str) -> Self {
        Self {
            store: Arc::new(object_store::memory::InMemory::new()),
            prefix: Path::from(prefix),
            kind: StoreKind::Memory,
            label: format!("memory:///{prefix}"),
        }
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The raw client, for callers that need operations the handle does
    /// not wrap.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Absolute key for a path relative to this handle's prefix.
    pub fn full_key(&self, subpath: &Path) -> Path {
        if self.prefix.as_ref().is_empty() {
            return subpath.clone();
        }
        Path::from_iter(self.prefix.parts().chain(subpath.parts()))
    }

    /// List every object under the prefix.
    pub async fn list(&self) -> Result<Vec<ObjectMeta>> {
        let prefix = if self.prefix.as_ref().is_empty() {
            None
        } else {
            Some(&self.prefix)
        };
        let mut stream = self.store.list(prefix);
        let mut objects = Vec::new();
        while let Some(meta) = stream.next().await {
            objects.push(meta?);
        }
        let count = objects.len();
        let label = &self.label;
        debug!("Listed {count} objects under {label}", count: count, label: label);
        Ok(objects)
    }

    /// Fetch one object fully into memory.
    pub async fn get_bytes(&self, key: &Path) -> Result<Bytes> {
        let result = self.store.get(key).await?;
        Ok(result.bytes().await?)
    }

    /// Upload `data` at `key`, attaching `content_type` on backends that
    /// support object attributes.
    pub async fn put_bytes(
        &self,
        key: &Path,
        data: Bytes,
        content_type: Option<&'static str>,
    ) -> Result<()> {
        match content_type {
            Some(ct) if self.kind.supports_attributes() => {
                let mut attributes = Attributes::new();
                attributes.insert(Attribute::ContentType, ct.into());
                self.store
                    .put_opts(key, data.into(), PutOptions::from(attributes))
                    .await?;
            }
            _ => {
                self.store.put(key, data.into()).await?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn host_bucket<'a>(url: &'a Url, raw: &str) -> Result<&'a str> {
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(host),
        _ => Err(StoreError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing bucket name".to_string(),
        }),
    }
}

fn url_prefix(url: &Url) -> Path {
    Path::from(url.path())
}
