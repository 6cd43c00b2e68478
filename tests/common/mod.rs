//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use greeting_service::config::ServiceConfig;
use greeting_service::health::HealthState;
use greeting_service::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const GREET: &str = "/flip/greeting/greet";
pub const LEGACY_DEPART: &str = "/flip/greeting/depart";
pub const DEPART: &str = "/flip/departing/depart";

pub const GREETING_V1: &str = "application/vnd.flipfoundry.greeting.v1+json";
pub const GREETING_V2: &str = "application/vnd.flipfoundry.greeting.v2+json";
pub const DEPARTING_V1: &str = "application/vnd.flipfoundry.departing.v1+json";

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub health: Arc<HealthState>,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server to drain.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle
            .await
            .expect("server task panicked")
            .expect("server returned an error");
    }
}

pub async fn spawn_server() -> TestServer {
    spawn_with(ServiceConfig::default()).await
}

pub async fn spawn_with(config: ServiceConfig) -> TestServer {
    let server = HttpServer::new(config).expect("standard routes build");
    let health = server.health();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        health,
        shutdown,
        handle,
    }
}
