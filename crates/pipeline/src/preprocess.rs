//! Stage two: resize every raw image and upload the PNG results.

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use object_store::path::Path;

use blobstore::{StoreHandle, relative_key};
use diagnostics::{debug, info, warn};

use crate::config::{DEFAULT_PARTITION_MULTIPLIER, PipelineConfig, ResizeSettings};
use crate::error::Result;
use crate::partition::{default_worker_count, repartition};

/// Tuning for [`preprocess`].
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// Target dimensions for every output image.
    pub resize: ResizeSettings,
    /// Concurrent partition workers. Defaults to the host CPU count.
    pub workers: Option<usize>,
    /// Partitions dealt to each worker. More partitions smooth out
    /// uneven object sizes at the cost of smaller batches.
    pub partition_multiplier: usize,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            resize: ResizeSettings::default(),
            workers: None,
            partition_multiplier: DEFAULT_PARTITION_MULTIPLIER,
        }
    }
}

impl From<&PipelineConfig> for PreprocessOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            resize: config.resize,
            workers: config.workers,
            partition_multiplier: config.partition_multiplier,
        }
    }
}

/// Counters reported by a preprocess run.
#[derive(Debug, Default, Clone)]
pub struct PreprocessStats {
    /// Objects listed under the source prefix
    pub listed: usize,
    /// Partitions the listing was dealt into
    pub partitions: usize,
    /// Resized images uploaded
    pub uploaded: usize,
    /// Inputs skipped because they did not decode
    pub skipped: usize,
    /// Raw bytes read from the source
    pub bytes_in: u64,
    /// Encoded bytes written to the destination
    pub bytes_out: u64,
}

#[derive(Default)]
struct PartitionStats {
    uploaded: usize,
    skipped: usize,
    bytes_in: u64,
    bytes_out: u64,
}

/// Resize every object under the source prefix and upload the PNG
/// result at the same subpath under the destination prefix, tagged
/// `image/png` where the backend carries content types.
///
/// The listing is dealt round-robin into `workers *
/// partition_multiplier` partitions. Up to `workers` partitions run
/// concurrently; within a partition objects are handled one at a time.
/// Inputs that fail to decode are logged and counted but never fail the
/// run. Store errors abort it.
pub async fn preprocess(
    source: &StoreHandle,
    destination: &StoreHandle,
    options: &PreprocessOptions,
) -> Result<PreprocessStats> {
    let objects = source.list().await?;
    let listed = objects.len();

    let rows: Vec<(Path, Path)> = objects
        .into_iter()
        .filter_map(|meta| {
            relative_key(&meta.location, source.prefix()).map(|subpath| (meta.location, subpath))
        })
        .collect();

    let workers = options.workers.unwrap_or_else(default_worker_count).max(1);
    let partitions = repartition(rows, workers * options.partition_multiplier.max(1));

    let mut stats = PreprocessStats {
        listed,
        partitions: partitions.len(),
        ..PreprocessStats::default()
    };

    let partition_count = stats.partitions;
    let source_label = source.to_string();
    let destination_label = destination.to_string();
    info!(
        "Preprocessing {listed} objects from {source_label} to {destination_label}: {partition_count} partitions, {workers} workers",
        listed: listed,
        source_label: source_label,
        destination_label: destination_label,
        partition_count: partition_count,
        workers: workers,
    );

    let resize = options.resize;
    let mut results = stream::iter(partitions.into_iter().enumerate().map(|(index, rows)| {
        let source = source.clone();
        let destination = destination.clone();
        async move { process_partition(index, rows, source, destination, resize).await }
    }))
    .buffer_unordered(workers);

    while let Some(result) = results.next().await {
        let part = result?;
        stats.uploaded += part.uploaded;
        stats.skipped += part.skipped;
        stats.bytes_in += part.bytes_in;
        stats.bytes_out += part.bytes_out;
    }

    let uploaded = stats.uploaded;
    let skipped = stats.skipped;
    info!("Preprocess complete: {uploaded} uploaded, {skipped} skipped", uploaded: uploaded, skipped: skipped);
    Ok(stats)
}

/// Handle one partition sequentially, reusing the shared store clients.
async fn process_partition(
    index: usize,
    rows: Vec<(Path, Path)>,
    source: StoreHandle,
    destination: StoreHandle,
    resize: ResizeSettings,
) -> Result<PartitionStats> {
    let row_count = rows.len();
    debug!("Partition {index}: processing {row_count} objects", index: index, row_count: row_count);

    let mut stats = PartitionStats::default();
    for (key, subpath) in rows {
        let data = source.get_bytes(&key).await?;
        stats.bytes_in += data.len() as u64;

        // Decode and resize are CPU bound, keep them off the IO threads.
        let (width, height) = (resize.width, resize.height);
        let resized =
            tokio::task::spawn_blocking(move || imagery::resize_to_png(&data, width, height))
                .await?;

        match resized {
            Ok(png) => {
                stats.bytes_out += png.len() as u64;
                let target = destination.full_key(&subpath);
                destination
                    .put_bytes(&target, Bytes::from(png), Some(imagery::CONTENT_TYPE_PNG))
                    .await?;
                stats.uploaded += 1;

                let src = key.as_ref();
                let dst = target.as_ref();
                debug!("Uploaded {src} as {dst}", src: src, dst: dst);
            }
            Err(err) => {
                stats.skipped += 1;
                let src = key.as_ref();
                let reason = err.to_string();
                warn!("Skipping {src}: {reason}", src: src, reason: reason);
            }
        }
    }

    Ok(stats)
}
