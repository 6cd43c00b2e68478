//! Actuator endpoints: aggregate health, its liveness and readiness groups, and info.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::state::Status;
use crate::dispatch::Dispatcher;
use crate::http::server::AppState;

/// Body of a single health indicator or group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusBody {
    pub status: Status,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    pub liveness_state: StatusBody,
    pub ping: StatusBody,
    pub readiness_state: StatusBody,
}

/// Aggregate health: UP only while every component is UP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthBody {
    pub status: Status,
    pub components: Components,
    /// Health groups reachable under `/actuator/health/<group>`.
    pub groups: Vec<String>,
}

const GROUPS: [&str; 2] = ["liveness", "readiness"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteInfo {
    pub path: String,
    pub media_type: String,
    pub deprecated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoBody {
    pub name: String,
    pub version: String,
    pub routes: Vec<RouteInfo>,
}

fn status_code(status: Status) -> StatusCode {
    match status {
        Status::Up => StatusCode::OK,
        Status::OutOfService => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Aggregate of every component, with the status code of the worst one.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let liveness = state.health.liveness();
    let readiness = state.health.readiness();
    let status = if readiness == Status::Up && liveness == Status::Up {
        Status::Up
    } else {
        Status::OutOfService
    };
    let body = HealthBody {
        status,
        components: Components {
            liveness_state: StatusBody { status: liveness },
            ping: StatusBody { status: Status::Up },
            readiness_state: StatusBody { status: readiness },
        },
        groups: GROUPS.iter().map(|group| group.to_string()).collect(),
    };
    (status_code(status), Json(body))
}

/// The `liveness` group: UP for as long as the process serves requests.
pub async fn liveness(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.health.liveness();
    (status_code(status), Json(StatusBody { status }))
}

/// The `readiness` group: 503 once draining has begun.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.health.readiness();
    (status_code(status), Json(StatusBody { status }))
}

/// Service name, version and registered routes.
pub async fn info(State(state): State<AppState>) -> Json<InfoBody> {
    Json(info_body(&state.dispatcher))
}

/// Service name, version and the registered routes in registration order.
pub fn info_body(dispatcher: &Dispatcher) -> InfoBody {
    InfoBody {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        routes: dispatcher
            .table()
            .routes()
            .map(|route| RouteInfo {
                path: route.path.clone(),
                media_type: route.media_type.clone(),
                deprecated: route.deprecation.is_some(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::handlers::{standard_routes, GreetingCounter};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_info_lists_routes_in_order() {
        let table = standard_routes(&ApiConfig::default(), Arc::new(GreetingCounter::new())).unwrap();
        let info = info_body(&Dispatcher::new(table));

        assert_eq!(info.name, "greeting-service");
        let listed: Vec<_> = info
            .routes
            .iter()
            .map(|r| (r.path.as_str(), r.deprecated))
            .collect();
        assert_eq!(
            listed,
            [
                ("/flip/greeting/greet", true),
                ("/flip/greeting/greet", false),
                ("/flip/greeting/depart", true),
                ("/flip/departing/depart", false),
            ]
        );
    }

    #[test]
    fn test_health_body_wire_names() {
        let body = HealthBody {
            status: Status::Up,
            components: Components {
                liveness_state: StatusBody { status: Status::Up },
                ping: StatusBody { status: Status::Up },
                readiness_state: StatusBody { status: Status::OutOfService },
            },
            groups: vec!["liveness".into(), "readiness".into()],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "status": "UP",
                "components": {
                    "livenessState": { "status": "UP" },
                    "ping": { "status": "UP" },
                    "readinessState": { "status": "OUT_OF_SERVICE" }
                },
                "groups": ["liveness", "readiness"]
            })
        );
    }
}
