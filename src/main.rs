//! Edge redirect service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌────────┐    ┌──────────┐    ┌──────────┐
//!     ───────────────────▶│  http  │───▶│ routing  │───▶│  query   │
//!                         │ server │    │ resolver │    │  merge   │
//!                         └───┬────┘    └────┬─────┘    └──────────┘
//!                             │              │
//!     301/302 + Location ◀────┘◀─────────────┘ redirect
//!     upstream response  ◀──── pass-through (no rule matched)
//!
//!     config (TOML) ──▶ route table ──▶ hot-swapped on file change
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_redirect::config::{self, watcher::ConfigWatcher, ServiceConfig};
use edge_redirect::observability::{logging, metrics};
use edge_redirect::HttpServer;

#[derive(Parser)]
#[command(name = "edge-redirect")]
#[command(about = "Host and path based HTTP redirect service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the route table when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("edge-redirect v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        hosts = config.routes.host_count(),
        rules = config.routes.rule_count(),
        upstream = ?config.upstream.as_ref().map(|u| &u.address),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener, config_updates).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
