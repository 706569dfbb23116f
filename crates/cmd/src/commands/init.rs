use std::path::Path;

use anyhow::{Context, Result};
use pipeline::create_example_config;

/// Write an example configuration file at `config_path`.
pub async fn init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}\nPass --force to overwrite it",
            config_path.display()
        );
    }

    create_example_config(config_path)
        .with_context(|| format!("Failed to create configuration file {}", config_path.display()))?;

    println!("Created example configuration: {}", config_path.display());
    println!();
    println!("Edit it to point at your buckets:");
    println!("  - source.url: store holding the raw PNG captures");
    println!("  - destination.url: store receiving the resized images");
    println!("  - service_account / access keys, if not using ambient credentials");
    println!();
    println!("Then run `sluice check` to verify access.");
    Ok(())
}
