//! Versioned greeting service library.

pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
