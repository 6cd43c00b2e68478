//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): dispatched requests by resource
//! - `api_request_duration_seconds` (histogram): handler latency by resource, outcome
//! - `api_errors_total` (counter): failed dispatches by resource
//! - `api_deprecated_requests_total` (counter): calls to deprecated routes
//! - `api_negotiation_failures_total` (counter): 404/406 before any handler ran
//!
//! # Design Decisions
//! - One request increment before the handler, one duration after it
//! - Labels use the logical resource so versions aggregate together
//! - Prometheus exporter runs on its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "api_requests_total";
pub const REQUEST_DURATION: &str = "api_request_duration_seconds";
pub const ERRORS_TOTAL: &str = "api_errors_total";
pub const DEPRECATED_REQUESTS_TOTAL: &str = "api_deprecated_requests_total";
pub const NEGOTIATION_FAILURES_TOTAL: &str = "api_negotiation_failures_total";

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Register descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Requests dispatched to a handler");
    describe_histogram!(REQUEST_DURATION, Unit::Seconds, "Handler execution time");
    describe_counter!(ERRORS_TOTAL, "Dispatches that ended in a handler failure");
    describe_counter!(DEPRECATED_REQUESTS_TOTAL, "Requests served by deprecated routes");
    describe_counter!(
        NEGOTIATION_FAILURES_TOTAL,
        "Requests rejected before dispatch (unknown path, unacceptable media type)"
    );
}

/// Count a dispatch before its handler runs.
pub fn record_request(resource: &str) {
    counter!(REQUESTS_TOTAL, "resource" => resource.to_string()).increment(1);
}

/// Record handler duration and, on failure, the error counter.
pub fn record_outcome(resource: &str, start: Instant, success: bool) {
    let outcome = if success { "success" } else { "error" };
    histogram!(
        REQUEST_DURATION,
        "resource" => resource.to_string(),
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());

    if !success {
        counter!(ERRORS_TOTAL, "resource" => resource.to_string()).increment(1);
    }
}

/// Count a call to a deprecated route.
pub fn record_deprecated_use(path: &str, media_type: &str) {
    counter!(
        DEPRECATED_REQUESTS_TOTAL,
        "path" => path.to_string(),
        "media_type" => media_type.to_string()
    )
    .increment(1);
}

/// Count a request rejected by negotiation.
pub fn record_negotiation_failure(reason: &'static str) {
    counter!(NEGOTIATION_FAILURES_TOTAL, "reason" => reason).increment(1);
}
