//! Object store access for the sluice pipelines.
//!
//! Wraps the `object_store` crate with URL-based connection, prefix
//! scoping, and the key helpers both pipeline stages share. A
//! [`StoreHandle`] is a connected backend plus the prefix all of its
//! operations are scoped to, so the rest of the workspace never deals
//! with buckets or schemes directly.

pub mod config;
pub mod error;
pub mod handle;
pub mod keys;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use handle::{StoreHandle, StoreKind};
pub use keys::{is_png, relative_key};
