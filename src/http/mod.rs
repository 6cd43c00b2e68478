//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, correlation id, tracing, timeout)
//!     → openapi.rs (API document, built once from the route table)
//!     → request.rs (correlation id, query decoding)
//!     → dispatch (route resolution, handler)
//!     → response.rs (media type, deprecation headers, error body)
//!     → Send to client
//! ```

pub mod openapi;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CorrelationId, X_CORRELATION_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
