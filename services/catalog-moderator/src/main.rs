//! Catalog Moderator CLI
//!
//! Command-line interface for the catalog moderation dashboard.

use std::path::PathBuf;

use catalog_moderator::{load_config, Config};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "catalog-moderator")]
#[command(about = "Moderation dashboard for the mini-app catalog")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Admin API base URL (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Operator id supplied by the chat host (overrides config file)
    #[arg(long)]
    operator_id: Option<String>,

    /// Mark the session as embedded in the chat host
    #[arg(long)]
    embedded: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, operator_id={:?}, embedded={}",
        args.config,
        args.port,
        args.operator_id,
        args.embedded
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(port) = args.port {
        config.dashboard.port = port;
    }
    if let Some(backend_url) = args.backend_url {
        config.backend.base_url = backend_url;
    }
    if let Some(operator_id) = args.operator_id {
        config.host.operator_id = Some(operator_id);
    }
    if args.embedded {
        config.host.embedded = true;
    }

    tracing::info!("Starting catalog moderator");
    tracing::debug!(
        "Backend: {}, operator: {:?}, embedded: {}",
        config.backend.base_url,
        config.host.operator_id,
        config.host.embedded
    );

    catalog_moderator::run(config).await?;

    Ok(())
}
