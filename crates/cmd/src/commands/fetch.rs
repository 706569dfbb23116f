use std::path::Path;

use anyhow::{Context, Result};
use blobstore::StoreHandle;
use pipeline::{MirrorOptions, MirrorStats, PipelineConfig, mirror};

use crate::common::{format_file_size, timestamp};

/// Run stage one: mirror raw PNG objects into the local directory.
pub async fn fetch_command(config: &PipelineConfig, skip_existing: bool) -> Result<MirrorStats> {
    let source = StoreHandle::connect(&config.source)
        .with_context(|| format!("Failed to connect to source store {}", config.source.url))?;

    let options = MirrorOptions { skip_existing };
    let stats = mirror(&source, Path::new(&config.local_dir), &options)
        .await
        .context("Mirror failed")?;

    println!(
        "Fetched {} of {} objects into {} ({}), {} skipped, {} ignored [{}]",
        stats.downloaded,
        stats.listed,
        config.local_dir,
        format_file_size(stats.bytes_downloaded),
        stats.skipped_existing,
        stats.ignored,
        timestamp()
    );
    Ok(stats)
}
