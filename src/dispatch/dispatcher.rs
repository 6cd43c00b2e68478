//! Request dispatch over the route table.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde_json::Value;

use crate::dispatch::error::DispatchError;
use crate::handlers::{HandlerError, HandlerRequest};
use crate::observability::metrics;
use crate::routing::{Deprecation, RouteTable};

/// Inputs of one dispatch.
#[derive(Debug, Clone, Copy)]
pub struct DispatchRequest<'a> {
    pub path: &'a str,
    pub accept: Option<&'a str>,
    pub params: &'a HashMap<String, String>,
    pub correlation_id: &'a str,
}

/// Successful dispatch result.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub body: Value,
    /// Matched media type, used verbatim as `Content-Type`.
    pub media_type: String,
    pub resource: String,
    pub deprecation: Option<Deprecation>,
}

/// Resolves requests against an immutable [`RouteTable`] and runs handlers.
#[derive(Debug)]
pub struct Dispatcher {
    table: RouteTable,
}

impl Dispatcher {
    /// Dispatch over `table`, which is never modified afterwards.
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// The routes being served.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve, execute and measure one request.
    pub fn dispatch(&self, request: &DispatchRequest<'_>) -> Result<Dispatched, DispatchError> {
        let route = match self.table.resolve(request.path, request.accept) {
            Ok(route) => route,
            Err(err) => {
                metrics::record_negotiation_failure(err.reason());
                tracing::debug!(
                    correlation_id = %request.correlation_id,
                    path = %request.path,
                    accept = ?request.accept,
                    error = %err,
                    "Negotiation failed"
                );
                return Err(err.into());
            }
        };

        if let Some(deprecation) = &route.deprecation {
            tracing::warn!(
                correlation_id = %request.correlation_id,
                path = %route.path,
                media_type = %route.media_type,
                since = %deprecation.since,
                for_removal = deprecation.for_removal,
                "Deprecated route called"
            );
            metrics::record_deprecated_use(&route.path, &route.media_type);
        }

        metrics::record_request(&route.resource);
        let start = Instant::now();

        let handler_request = HandlerRequest::new(request.params);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            route.handler().handle(&handler_request)
        }))
        .unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload.as_ref()))));

        metrics::record_outcome(&route.resource, start, outcome.is_ok());

        match outcome {
            Ok(body) => Ok(Dispatched {
                body,
                media_type: route.media_type.clone(),
                resource: route.resource.clone(),
                deprecation: route.deprecation.clone(),
            }),
            Err(source) => {
                tracing::error!(
                    correlation_id = %request.correlation_id,
                    path = %route.path,
                    media_type = %route.media_type,
                    resource = %route.resource,
                    error = %source,
                    "Handler failed"
                );
                Err(DispatchError::Internal {
                    path: route.path.clone(),
                    source,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
