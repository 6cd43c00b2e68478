//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: actuator endpoints, API document, and the versioned API
//! - Wire up middleware (correlation id, tracing, timeout with the shared error body)
//! - Adapt HTTP requests into dispatches and dispatch results into responses
//! - Serve until shutdown, flipping readiness before draining

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::dispatch::{DispatchError, DispatchRequest, Dispatched, Dispatcher};
use crate::handlers::{standard_routes, GreetingCounter};
use crate::health::{endpoints, HealthState};
use crate::http::request::{
    propagate_correlation_id_layer, query_params, set_correlation_id_layer, CorrelationId,
    X_CORRELATION_ID,
};
use crate::http::openapi::{self, API_DOCS_PATH};
use crate::http::response::ApiError;
use crate::routing::{RouteError, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub health: Arc<HealthState>,
}

/// HTTP server for the versioned API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    health: Arc<HealthState>,
}

impl HttpServer {
    /// Create a server exposing the standard greeting and departing routes.
    pub fn new(config: ServiceConfig) -> Result<Self, RouteError> {
        let table = standard_routes(&config.api, Arc::new(GreetingCounter::new()))?;
        Ok(Self::with_routes(config, table))
    }

    /// Create a server over an already built route table.
    pub fn with_routes(config: ServiceConfig, table: RouteTable) -> Self {
        for route in table.routes() {
            tracing::debug!(
                path = %route.path,
                media_type = %route.media_type,
                default = route.is_default,
                deprecated = route.deprecation.is_some(),
                "Route registered"
            );
        }
        tracing::info!(paths = ?table.paths().collect::<Vec<_>>(), "Route table built");

        let health = Arc::new(HealthState::new());
        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(table)),
            health: health.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            health,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/actuator/health", get(endpoints::health))
            .route("/actuator/health/liveness", get(endpoints::liveness))
            .route("/actuator/health/readiness", get(endpoints::readiness))
            .route("/actuator/info", get(endpoints::info));

        if config.openapi.enabled {
            let docs = Arc::new(openapi::document(&config.openapi, state.dispatcher.table()));
            tracing::info!(path = API_DOCS_PATH, "API document enabled");
            router = router.route(
                API_DOCS_PATH,
                get(move || {
                    let docs = docs.clone();
                    async move { Json(docs.as_ref().clone()) }
                }),
            );
        }

        let router = router.fallback(api_handler).with_state(state);
        with_layers(router, Duration::from_secs(config.timeouts.request_secs))
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let health = self.health.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                health.mark_draining();
                tracing::info!("Shutdown signal received, draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Shared health state, readable after `run` consumed the server.
    pub fn health(&self) -> Arc<HealthState> {
        self.health.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Wrap `router` in the correlation id, trace span and timeout layers.
#[allow(deprecated)]
fn with_layers(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(set_correlation_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let correlation_id = request
                    .headers()
                    .get(X_CORRELATION_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    correlation_id = %correlation_id
                )
            }))
            .layer(propagate_correlation_id_layer())
            .layer(middleware::from_fn_with_state(
                u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX),
                timeout_error_body,
            ))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

/// Replace the timeout layer's empty 408 with the shared error body.
async fn timeout_error_body(
    State(timeout_ms): State<u64>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let correlation_id = CorrelationId::from_headers(request.headers());

    let response = next.run(request).await;
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!(
        correlation_id = %correlation_id.as_str(),
        path = %path,
        timeout_ms,
        "Request timed out"
    );
    ApiError {
        error: DispatchError::Timeout { timeout_ms },
        path,
        correlation_id: correlation_id.0,
    }
    .into_response()
}

/// Fallback handler: every path that is not an actuator or document route goes through the dispatcher.
async fn api_handler(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let path = uri.path();

    let (response, media_type) =
        match dispatch(&state, &method, &uri, &headers, correlation_id.as_str()) {
            Ok(dispatched) => {
                let media_type = dispatched.media_type.clone();
                (dispatched.into_response(), Some(media_type))
            }
            Err(error) => {
                let response = ApiError {
                    error,
                    path: path.to_string(),
                    correlation_id: correlation_id.0.clone(),
                }
                .into_response();
                (response, None)
            }
        };

    tracing::info!(
        correlation_id = %correlation_id.as_str(),
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        media_type = media_type.as_deref().unwrap_or("-"),
        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Request completed"
    );
    response
}

fn dispatch(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    correlation_id: &str,
) -> Result<Dispatched, DispatchError> {
    let path = uri.path();
    if *method != Method::GET && *method != Method::HEAD {
        return Err(if state.dispatcher.table().contains(path) {
            DispatchError::MethodNotAllowed {
                method: method.to_string(),
            }
        } else {
            DispatchError::NotFound {
                path: path.to_string(),
            }
        });
    }

    let params = query_params(uri)?;
    let accept = accept_header(headers);
    state.dispatcher.dispatch(&DispatchRequest {
        path,
        accept: accept.as_deref(),
        params: &params,
        correlation_id,
    })
}

/// All `Accept` header lines joined into one list.
fn accept_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(header::ACCEPT)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}
