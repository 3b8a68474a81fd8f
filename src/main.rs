//! First Lane Rentals listing API.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 FIRSTLANE                     │
//!                     │                                               │
//!   Client Request    │  ┌──────────┐   ┌───────────┐   ┌─────────┐  │
//!   ──────────────────┼─▶│ security │──▶│    api    │──▶│  store  │  │
//!                     │  │ headers+ │   │ cars/     │   │ memory  │  │
//!                     │  │ admission│   │ bookings  │   └─────────┘  │
//!                     │  └──────────┘   └─────┬─────┘                │
//!                     │                       │ booking created      │
//!                     │                       ▼                      │
//!                     │                 ┌──────────┐   webhook/email │
//!                     │                 │  notify  │─────────────────┼──▶
//!                     │                 └──────────┘                 │
//!                     │  ┌────────────────────────────────────────┐  │
//!                     │  │   config · observability · lifecycle   │  │
//!                     │  └────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use firstlane::config::loader;
use firstlane::http::HttpServer;
use firstlane::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "firstlane", about = "Car rental listing API")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => loader::load_config(path)?,
        None => loader::default_config()?,
    };

    logging::init(config.observability.log_json);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        path_prefix = %config.rate_limit.path_prefix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
