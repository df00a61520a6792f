//! Relay gateway (v1)
//!
//! Front door for application calls, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                RELAY GATEWAY                 │
//!   Client Request      │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!   ────────────────────┼─▶│  http  │──▶│ failover│──▶│ forwarder  │───┼──▶ Active
//!                       │  │ server │   │controller   └────────────┘   │    Node
//!                       │  └───┬────┘   └────┬────┘                    │
//!                       │      │ admin       │ reselect                │
//!                       │      ▼             ▼                         │
//!                       │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!                       │  │registry│◀──│selector │──▶│health probe│───┼──▶ Status
//!                       │  └────────┘   └─────────┘   └────────────┘   │    Endpoints
//!                       │                                              │
//!                       │  config (file + hot reload) · lifecycle      │
//!                       │  logging · metrics                           │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use relay_gateway::config::loader::load_config;
use relay_gateway::config::watcher::ConfigWatcher;
use relay_gateway::lifecycle::{signals, Shutdown};
use relay_gateway::observability::{logging, metrics};
use relay_gateway::{GatewayConfig, GatewayServer};

#[derive(Parser)]
#[command(name = "relay-gateway")]
#[command(about = "Single front door that fails over between backend nodes", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "relay-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        known_nodes = config.nodes.known.len(),
        probe_timeout_ms = config.timeouts.probe_timeout_ms,
        forward_timeout_ms = config.timeouts.forward_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::install(shutdown.clone());

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(handle) => (Some(handle), updates),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    (None, updates)
                }
            }
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let server = GatewayServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
