//! Redirect Gateway
//!
//! Resolve-then-forward HTTP gateway built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               REDIRECT GATEWAY                │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐   ┌────────────┐   ┌─────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│  resolver  │──▶│ forward │──┼──▶ Resolved
//!                    │  │ server  │   │ middleware │   │ handler │  │    destination
//!                    │  └─────────┘   └─────┬──────┘   └─────────┘  │
//!                    │                      │ GET <service><path>    │
//!                    │                      ▼                        │
//!                    │               backend lookup service          │
//!                    │                                               │
//!                    │  ┌─────────────────────────────────────────┐  │
//!                    │  │ config · observability · lifecycle       │  │
//!                    │  └─────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use redirect_gateway::config::load_config;
use redirect_gateway::http::HttpServer;
use redirect_gateway::lifecycle::Shutdown;
use redirect_gateway::observability::{logging, metrics};

/// A resolve-then-forward HTTP gateway.
#[derive(Parser, Debug)]
#[command(name = "redirect-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %args.config.display(),
        bind_address = %config.listener.bind_address,
        service = %config.resolver.service,
        lookup_timeout_secs = config.timeouts.lookup_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated at load time.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signal_shutdown.listen_for_ctrl_c().await;
    });

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
