use anyhow::{Context, Result};
use blobstore::{StoreHandle, is_png};
use pipeline::PipelineConfig;

/// Connect to both stores and probe the source listing.
///
/// A passing check means credentials work and the source prefix is
/// reachable; it says nothing about the destination prefix contents.
pub async fn check_command(config: &PipelineConfig) -> Result<()> {
    println!("Checking source store {}", config.source.url);
    let source = StoreHandle::connect(&config.source)
        .with_context(|| format!("Failed to connect to source store {}", config.source.url))?;

    println!("Checking destination store {}", config.destination.url);
    StoreHandle::connect(&config.destination).with_context(|| {
        format!(
            "Failed to connect to destination store {}",
            config.destination.url
        )
    })?;

    let objects = source
        .list()
        .await
        .with_context(|| format!("Failed to list source store {}", config.source.url))?;
    let pngs = objects.iter().filter(|meta| is_png(&meta.location)).count();

    println!(
        "Source listing OK: {} objects under the prefix, {} PNG",
        objects.len(),
        pngs
    );
    println!("Check passed");
    Ok(())
}
