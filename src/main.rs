//! REST Backend Adapter
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  ADAPTER                     │
//!   Client Request     │  ┌────────┐   ┌────────────┐                 │
//!  ────────────────────┼─▶│  http  │──▶│  routing   │                 │
//!                      │  │ server │   │ dispatcher │                 │
//!                      │  └────────┘   └─────┬──────┘                 │
//!                      │        ┌────────────┼─────────────┐          │
//!                      │        ▼            ▼             ▼          │
//!                      │  ┌─────────┐  ┌──────────┐  ┌───────────┐    │
//!                      │  │ upsert  │  │  login   │  │passthrough│    │
//!                      │  └────┬────┘  └────┬─────┘  └─────┬─────┘    │
//!                      │       └── capture ─┘              │          │
//!                      │              ▼                    ▼          │
//!   Client Response    │         ┌──────────────────────────────┐     │
//!  ◀───────────────────┼─────────│          forwarder           │◀────┼──── Backend
//!                      │         └──────────────────────────────┘     │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use rest_adapter::config::{load_config, Cli};
use rest_adapter::lifecycle::signals::shutdown_signal;
use rest_adapter::observability::{logging, metrics};
use rest_adapter::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_format);

    tracing::info!("rest-adapter v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        login_path = %config.login.path,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
