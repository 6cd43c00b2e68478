//! Endpoint handlers.
//!
//! # Data Flow
//! ```text
//! Dispatcher (route resolved)
//!     → Handler::handle(HandlerRequest)
//!     → DTO built (greeting.rs / departing.rs)
//!     → serde_json::Value returned to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Handlers are synchronous and never block: formatting, a clock read,
//!   and at most one atomic increment
//! - The v1 greeting counter is the only shared mutable state
//! - Legacy and current depart routes are independent table entries

pub mod clock;
pub mod departing;
pub mod greeting;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::ApiConfig;
use crate::routing::deprecation::Deprecation;
use crate::routing::media_type::vendor;
use crate::routing::table::{Route, RouteDoc, RouteError, RouteTable};

pub use clock::{Clock, SystemClock};
pub use departing::{Depart, Departure, LegacyDepart};
pub use greeting::{GreetV1, GreetV2, GreetingCounter, GreetingV1, GreetingV2};

/// Logical resource served under the greeting base path.
pub const GREETING: &str = "greeting";
/// Logical resource served under the departing base path.
pub const DEPARTING: &str = "departing";

/// Errors raised while producing a response body.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The DTO could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The handler panicked; carries the panic message.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// Any other handler-reported failure.
    #[error("{0}")]
    Failed(String),
}

/// Inputs visible to a handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerRequest<'a> {
    params: &'a HashMap<String, String>,
}

impl<'a> HandlerRequest<'a> {
    /// Wrap decoded query parameters.
    pub fn new(params: &'a HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Raw query parameter.
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params.get(name).map(String::as_str)
    }

    /// Query parameter, or `default` when missing or empty.
    pub fn param_or(&self, name: &str, default: &'a str) -> &'a str {
        match self.param(name) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }
}

/// A versioned endpoint implementation.
pub trait Handler: Send + Sync {
    /// Produce the JSON body for one request.
    fn handle(&self, request: &HandlerRequest<'_>) -> Result<Value, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&HandlerRequest<'_>) -> Result<Value, HandlerError> + Send + Sync,
{
    fn handle(&self, request: &HandlerRequest<'_>) -> Result<Value, HandlerError> {
        self(request)
    }
}

pub(crate) fn to_body<T: Serialize>(dto: &T) -> Result<Value, HandlerError> {
    Ok(serde_json::to_value(dto)?)
}

/// Build the service's route table.
///
/// | Path | Media type | Default | Deprecated |
/// |---|---|---|---|
/// | `{greeting}/greet` | greeting v1 | no | since 1.3 |
/// | `{greeting}/greet` | greeting v2 | yes | no |
/// | `{greeting}/depart` | greeting v1 | yes | since 1.2, for removal |
/// | `{departing}/depart` | departing v1 | yes | no |
pub fn standard_routes(
    config: &ApiConfig,
    counter: Arc<GreetingCounter>,
) -> Result<RouteTable, RouteError> {
    let greeting_v1 = vendor(&config.namespace, GREETING, 1);
    let greeting_v2 = vendor(&config.namespace, GREETING, 2);
    let departing_v1 = vendor(&config.namespace, DEPARTING, 1);

    let greet_path = format!("{}/greet", config.greeting_base);
    let legacy_depart_path = format!("{}/depart", config.greeting_base);
    let depart_path = format!("{}/depart", config.departing_base);

    RouteTable::builder()
        .route(
            Route::new(&greet_path, &greeting_v1, GREETING, GreetV1::new(counter))
                .deprecated(
                    Deprecation::since("1.3")
                        .with_sunset(config.greet_v1_sunset)
                        .with_successor(greet_path.clone())
                        .with_successor_type(greeting_v2.clone()),
                )
                .documented(
                    RouteDoc::new("Numbered greeting", "GreetingV1", greeting::v1_schema())
                        .with_query_param("name"),
                ),
        )
        .route(
            Route::new(&greet_path, &greeting_v2, GREETING, GreetV2)
                .default_for_path()
                .documented(
                    RouteDoc::new("Greeting", "GreetingV2", greeting::v2_schema())
                        .with_query_param("name"),
                ),
        )
        .route(
            Route::new(&legacy_depart_path, &greeting_v1, GREETING, LegacyDepart)
                .default_for_path()
                .documented(RouteDoc::new(
                    "Farewell without timestamp",
                    "Departure",
                    departing::departure_schema(),
                ))
                .deprecated(
                    Deprecation::since("1.2")
                        .for_removal()
                        .with_sunset(config.legacy_depart_sunset)
                        .with_successor(depart_path.clone()),
                ),
        )
        .route(
            Route::new(&depart_path, &departing_v1, DEPARTING, Depart::new(Arc::new(SystemClock)))
                .default_for_path()
                .documented(RouteDoc::new(
                    "Timestamped farewell",
                    "Departure",
                    departing::departure_schema(),
                )),
        )
        .build()
}
