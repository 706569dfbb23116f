use anyhow::{Context, Result};
use blobstore::StoreHandle;
use pipeline::{PipelineConfig, PreprocessOptions, PreprocessStats, preprocess};

use crate::common::{format_file_size, timestamp};

/// Run stage two: resize every raw object and upload the results.
pub async fn preprocess_command(config: &PipelineConfig) -> Result<PreprocessStats> {
    let source = StoreHandle::connect(&config.source)
        .with_context(|| format!("Failed to connect to source store {}", config.source.url))?;
    let destination = StoreHandle::connect(&config.destination).with_context(|| {
        format!(
            "Failed to connect to destination store {}",
            config.destination.url
        )
    })?;

    let options = PreprocessOptions::from(config);
    let stats = preprocess(&source, &destination, &options)
        .await
        .context("Preprocess failed")?;

    println!(
        "Preprocessed {} of {} objects to {} across {} partitions, {} skipped ({} in, {} out) [{}]",
        stats.uploaded,
        stats.listed,
        config.destination.url,
        stats.partitions,
        stats.skipped,
        format_file_size(stats.bytes_in),
        format_file_size(stats.bytes_out),
        timestamp()
    );
    Ok(stats)
}
