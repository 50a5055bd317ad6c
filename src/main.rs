//! HTTP-to-RPC bridge gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request         ┌──────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ http server ──▶ bridge::ArgumentGetter     │
//!                            │   (route table)    source selection          │
//!                            │                    resolvers + converters    │
//!                            │                          │                   │
//!                            │                          ▼                   │
//!                            │                    rpc::RpcInvoker ──────────┼──▶ RPC provider
//!                            │                          │                   │
//!     Client Response        │                          ▼                   │
//!     ◀──────────────────────┼── http response ◀── ResponseFormatter        │
//!                            │                                              │
//!                            │   config · observability (logs, metrics)     │
//!                            └──────────────────────────────────────────────┘
//! ```
//!
//! The shipped binary wires the loopback invoker, which echoes each decoded
//! call back to the client.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use dubbo_bridge::config::{load_config, BridgeConfig};
use dubbo_bridge::observability::{logging, metrics};
use dubbo_bridge::{HttpServer, LoopbackInvoker};

#[derive(Parser)]
#[command(name = "dubbo-bridge")]
#[command(about = "Bridge HTTP requests to RPC calls", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    if cli.check {
        println!("configuration ok: {} route(s)", config.routes.len());
        return Ok(());
    }

    logging::init(&config.observability.log_level);
    tracing::info!("dubbo-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    if config.routes.is_empty() {
        tracing::warn!("No routes configured; every request will return 404");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, Arc::new(LoopbackInvoker))?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
