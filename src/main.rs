//! Versioned greeting service.
//!
//! Serves several versions of the same endpoint side by side, selecting one
//! per request from the `Accept` header's vendor media type.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ dispatch ──▶ routing::table ──▶ handlers
//!                      (correlation      (metrics,     (path + Accept     (greet v1/v2,
//!                       id, tracing)      panics)       negotiation)       depart)
//!     Client Response
//!     ◀────────────── http::response ◀── Dispatched / DispatchError
//!                      (Content-Type, deprecation headers, error body)
//!
//!     Cross-cutting: config, observability (logs + Prometheus), health, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use greeting_service::config::{load_config, ServiceConfig};
use greeting_service::lifecycle::startup;
use greeting_service::observability::logging;

#[derive(Debug, Parser)]
#[command(name = "greeting-service", version, about = "Versioned greeting service")]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "greeting-service starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
