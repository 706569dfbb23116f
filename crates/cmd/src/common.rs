use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pipeline::{PipelineConfig, load_config};

/// Environment variable naming the config file when --config is absent
pub const CONFIG_ENV: &str = "SLUICE_CONFIG";

/// Config file looked for in the working directory as the last resort
pub const DEFAULT_CONFIG_FILE: &str = "sluice.yaml";

/// Resolve the config file path: the --config flag wins, then the
/// SLUICE_CONFIG environment variable, then ./sluice.yaml.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path {
        return path;
    }
    env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load and validate the pipeline config at `path`, pointing the user
/// at `sluice init` when it is missing.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Configuration file not found: {}\nRun `sluice init` to create an example configuration",
            path.display()
        );
    }
    load_config(path).with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Helper function to format byte counts for summaries
pub fn format_file_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1}MB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{}B", size)
    }
}

/// Wall-clock timestamp printed at the end of each stage summary
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
