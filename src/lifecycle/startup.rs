//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, routes, listener)
//! - Serve until a shutdown signal arrives
//! - Bound the drain by the configured grace period
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last so traffic only arrives once routes are built

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::RouteError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address {address}: {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("inconsistent route table: {0}")]
    Routes(#[from] RouteError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] JoinError),
}

/// Start every subsystem and serve until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
            address: address.clone(),
            source,
        })?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config.clone())?;

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => return Ok(result??),
        _ = signals::wait_for_signal() => {}
    }

    shutdown.trigger();
    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);
    match tokio::time::timeout(grace, server_task).await {
        Ok(result) => Ok(result??),
        Err(_) => {
            tracing::warn!(
                grace_secs = config.timeouts.shutdown_grace_secs,
                "Grace period elapsed with requests in flight, exiting"
            );
            Ok(())
        }
    }
}
