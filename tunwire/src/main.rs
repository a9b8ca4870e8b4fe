#![forbid(unsafe_code)]

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tunwire_core::load_from_path;

#[derive(Parser, Debug)]
#[command(author, version, about = "Point-to-point encrypted TUN/TAP tunnel")]
struct Cli {
    /// Path to the configuration file
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let cfg = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(dev = %cfg.dev, ?cfg.mode, "configuration loaded");
    if let Err(err) = tunwire_core::run(cfg).await {
        error!(%err, "tunnel exited with error");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
