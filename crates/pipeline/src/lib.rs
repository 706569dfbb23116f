//! Two-stage image pipeline over object storage.
//!
//! Stage one ([`mirror`]) downloads every raw `.png` object under the
//! source prefix into a local directory, recreating the key hierarchy.
//! Stage two ([`preprocess`]) reads every raw object, resizes it to a
//! fixed target, and uploads the PNG result at the same subpath under
//! the destination prefix.
//!
//! Both stages operate on [`blobstore::StoreHandle`]s, so they run
//! unchanged against cloud buckets, local directories, and the
//! in-memory store the tests use.

pub mod config;
pub mod error;
pub mod mirror;
pub mod partition;
pub mod preprocess;

// Re-export key types for use in tests and external applications
pub use crate::config::{
    PipelineConfig, ResizeSettings, create_example_config, load_config,
};
pub use crate::error::{PipelineError, Result};
pub use crate::mirror::{MirrorOptions, MirrorStats, mirror};
pub use crate::partition::{default_worker_count, repartition};
pub use crate::preprocess::{PreprocessOptions, PreprocessStats, preprocess};
