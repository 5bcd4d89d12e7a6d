//! parkd - The parking session service
//!
//! Parses arguments, sets up logging and hands over to [`parkd::Service`].

use anyhow::Result;
use clap::Parser;
use parkd::{Service, load_config_or_builtin};
use parkd_util::{PARKD_CONFIG_ENV, default_config_path};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// parkd - Parking session ledger and cost calculator service
#[derive(Parser, Debug)]
#[command(name = "parkd")]
#[command(about = "Parking session ledger and cost calculator service", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/parkd/config.toml).
    /// The built-in seed is used when the file does not exist.
    #[arg(short, long, env = PARKD_CONFIG_ENV, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Socket path override (or set PARKD_SOCKET env var)
    #[arg(short, long, env = "PARKD_SOCKET")]
    socket: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "parkd starting"
    );

    if parkd_util::is_mock_time_active() {
        info!(now = %parkd_util::format_datetime_full(&parkd_util::now()), "Mock time active");
    }

    let config = load_config_or_builtin(&args.config)?;
    let service = Service::new(config, args.socket).await?;
    service.run().await
}
