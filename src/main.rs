use std::path::PathBuf;

use clap::Parser;

use page_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use page_relay::lifecycle::{startup, Shutdown};
use page_relay::observability::logging;

#[derive(Parser)]
#[command(name = "page-relay")]
#[command(about = "Fetches third-party pages on behalf of browser clients", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        "page-relay starting"
    );

    let shutdown = Shutdown::new();
    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
