use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{check, fetch, init, preprocess};
use cmd::common::{load_pipeline_config, resolve_config_path};

#[derive(Parser)]
#[command(author, version, about = "Two-stage image ETL over object storage", long_about = None)]
#[command(name = "sluice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (falls back to SLUICE_CONFIG, then ./sluice.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Verify store credentials and source reachability
    Check,
    /// Stage 1: mirror raw PNG objects into the local directory
    Fetch {
        /// Leave files that already exist locally untouched
        #[arg(long)]
        skip_existing: bool,
    },
    /// Stage 2: resize every raw object and upload the results
    Preprocess,
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init_diagnostics();
    env_logger::init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);

    match cli.command {
        Commands::Init { force } => init::init_command(&config_path, force).await,
        Commands::Check => {
            let config = load_pipeline_config(&config_path)?;
            check::check_command(&config).await
        }
        Commands::Fetch { skip_existing } => {
            let config = load_pipeline_config(&config_path)?;
            fetch::fetch_command(&config, skip_existing).await?;
            Ok(())
        }
        Commands::Preprocess => {
            let config = load_pipeline_config(&config_path)?;
            preprocess::preprocess_command(&config).await?;
            Ok(())
        }
    }
}
