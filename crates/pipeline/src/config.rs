//! Pipeline configuration.

use std::path::Path;

use blobstore::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Partitions handed to each worker when the config leaves it unset.
pub const DEFAULT_PARTITION_MULTIPLIER: usize = 4;

/// Target dimensions for every preprocessed image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

/// Configuration shared by both pipeline stages
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PipelineConfig {
    /// Store holding the raw images
    pub source: StoreConfig,

    /// Store receiving the resized images
    pub destination: StoreConfig,

    /// Local directory the fetch stage mirrors raw images into
    #[serde(default = "default_local_dir")]
    pub local_dir: String,

    /// Output dimensions for the preprocessing stage
    #[serde(default)]
    pub resize: ResizeSettings,

    /// Concurrent workers for the preprocessing stage. Defaults to the
    /// host CPU count when unset.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Partitions per worker for the preprocessing stage
    #[serde(default = "default_partition_multiplier")]
    pub partition_multiplier: usize,
}

fn default_local_dir() -> String {
    "data".to_string()
}

fn default_partition_multiplier() -> usize {
    DEFAULT_PARTITION_MULTIPLIER
}

/// Load configuration from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;

    let config: PipelineConfig = serde_yaml_ng::from_str(&content)?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub(crate) fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.source.url.is_empty() {
        return Err(config_error("source.url cannot be empty"));
    }

    if config.destination.url.is_empty() {
        return Err(config_error("destination.url cannot be empty"));
    }

    if config.local_dir.is_empty() {
        return Err(config_error("local_dir cannot be empty"));
    }

    if config.resize.width == 0 || config.resize.height == 0 {
        return Err(config_error("resize dimensions must be at least 1x1"));
    }

    if config.workers == Some(0) {
        return Err(config_error("workers must be at least 1 when set"));
    }

    if config.partition_multiplier == 0 {
        return Err(config_error("partition_multiplier must be at least 1"));
    }

    Ok(())
}

fn config_error(message: &str) -> PipelineError {
    PipelineError::Config {
        message: message.to_string(),
    }
}

/// Example configuration written by `sluice init`
pub const EXAMPLE_CONFIG: &str = r#"# Sluice pipeline configuration
#
# Stage 1 (`sluice fetch`) mirrors raw PNG objects from `source` into
# `local_dir`. Stage 2 (`sluice preprocess`) resizes every object under
# `source` and uploads the PNG results under `destination`.

# Store holding the raw captures. gs://, s3://, and file:// URLs work;
# everything after the bucket is the key prefix. Credentials left empty
# fall back to the process environment.
source:
  url: "gs://images-raw/raw"
  service_account: "service-account.json"

# Store receiving the resized images.
destination:
  url: "gs://images-preprocessed/resized"
  service_account: "service-account.json"

# Local mirror directory for stage 1.
local_dir: "data"

# Every output image is exactly this size; aspect ratio is not kept.
resize:
  width: 100
  height: 100

# Concurrency for stage 2. `workers` defaults to the CPU count when
# omitted; each worker is dealt `partition_multiplier` partitions.
# workers: 8
partition_multiplier: 4
"#;

/// Create example configuration file
pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, EXAMPLE_CONFIG).map_err(|e| PipelineError::Config {
        message: format!("Failed to write config file {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(yaml: &str) -> PipelineConfig {
        serde_yaml_ng::from_str(yaml).expect("config should parse")
    }

    const MINIMAL: &str = "source:\n  url: \"gs://b/raw\"\ndestination:\n  url: \"gs://b/out\"\n";

    #[test]
    fn example_config_parses_and_validates() {
        let config = parsed(EXAMPLE_CONFIG);
        validate_config(&config).expect("example config should validate");
        assert_eq!(config.source.url, "gs://images-raw/raw");
        assert_eq!(config.resize, ResizeSettings::default());
        assert_eq!(config.workers, None);
        assert_eq!(config.partition_multiplier, DEFAULT_PARTITION_MULTIPLIER);
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = parsed(MINIMAL);
        validate_config(&config).expect("minimal config should validate");
        assert_eq!(config.local_dir, "data");
        assert_eq!(config.resize.width, 100);
        assert_eq!(config.resize.height, 100);
        assert_eq!(config.partition_multiplier, 4);
    }

    #[test]
    fn rejects_zero_resize_dimensions() {
        let mut config = parsed(MINIMAL);
        config.resize.width = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_workers() {
        let mut config = parsed(MINIMAL);
        config.workers = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_empty_urls() {
        let mut config = parsed(MINIMAL);
        config.destination.url.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn load_config_round_trips_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sluice.yaml");
        create_example_config(&path).expect("write example");

        let config = load_config(&path).expect("load example");
        assert_eq!(config.destination.url, "gs://images-preprocessed/resized");
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config("/definitely/not/here.yaml").expect_err("must fail");
        assert!(matches!(err, PipelineError::Config { .. }));
    }

    #[test]
    fn load_config_reports_bad_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sluice.yaml");
        std::fs::write(&path, "source: [unclosed").expect("write");
        let err = load_config(&path).expect_err("must fail");
        assert!(matches!(err, PipelineError::ConfigParse(_)));
    }
}
