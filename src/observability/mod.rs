//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and HTTP layer produce:
//!     → logging.rs (structured log events, one access line per request)
//!     → metrics.rs (request counters, duration histograms, error counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape, separate listener)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Correlation ID flows through spans, access logs and error bodies
//! - Metrics are labelled per logical resource, not per version

pub mod logging;
pub mod metrics;
