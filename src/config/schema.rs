//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// API surface: media type namespace, base paths, sunset dates.
    pub api: ApiConfig,

    /// Published API description (`/v3/api-docs`).
    pub openapi: OpenApiConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, for local development.
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Versioned API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Vendor namespace in `application/vnd.<namespace>.<resource>.v<N>+json`.
    pub namespace: String,

    /// Base path of the greeting resource.
    pub greeting_base: String,

    /// Base path of the departing resource.
    pub departing_base: String,

    /// Sunset date (`YYYY-MM-DD`) of greet v1.
    pub greet_v1_sunset: Option<NaiveDate>,

    /// Sunset date (`YYYY-MM-DD`) of the legacy depart route.
    pub legacy_depart_sunset: Option<NaiveDate>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            namespace: "flipfoundry".to_string(),
            greeting_base: "/flip/greeting".to_string(),
            departing_base: "/flip/departing".to_string(),
            greet_v1_sunset: None,
            legacy_depart_sunset: None,
        }
    }
}

/// OpenAPI document metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// Serve `/v3/api-docs`.
    pub enabled: bool,

    /// `info.title`.
    pub title: String,

    /// `info.version`, the version of the API description.
    pub version: String,

    /// `info.description`.
    pub description: String,

    pub terms_of_service_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_url: Option<String>,
    pub contact_email: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
    pub external_docs_description: Option<String>,
    pub external_docs_url: Option<String>,

    /// Entry of the `servers` list.
    pub server_url: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "FlipFoundry Greeting API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Greeting and departing resources versioned by vendor media type"
                .to_string(),
            terms_of_service_url: None,
            contact_name: None,
            contact_url: None,
            contact_email: None,
            license_name: None,
            license_url: None,
            external_docs_description: None,
            external_docs_url: None,
            server_url: "/".to_string(),
        }
    }
}
