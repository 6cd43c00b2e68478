//! Response construction.
//!
//! # Responsibilities
//! - Render dispatched bodies with the matched media type
//! - Attach deprecation headers for deprecated routes
//! - Map dispatch errors to the shared JSON error body
//!
//! # Design Decisions
//! - `Content-Type` is the route's media type verbatim, never `application/json`
//! - Every error status shares one body shape

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchError, Dispatched};
use crate::routing::Deprecation;

const DEPRECATION: HeaderName = HeaderName::from_static("deprecation");
const SUNSET: HeaderName = HeaderName::from_static("sunset");

/// JSON body shared by all error responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(rename = "traceId")]
    pub trace_id: String,
}

impl ErrorBody {
    /// Body for `status`, stamped with the current UTC time.
    pub fn new(status: StatusCode, message: String, path: &str, trace_id: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
            path: path.to_string(),
            trace_id: trace_id.to_string(),
        }
    }
}

/// A dispatch error bound to the request it failed.
#[derive(Debug)]
pub struct ApiError {
    pub error: DispatchError,
    pub path: String,
    pub correlation_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let body = ErrorBody::new(
            status,
            self.error.public_message(),
            &self.path,
            &self.correlation_id,
        );
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for Dispatched {
    fn into_response(self) -> Response {
        let mut response = Json(self.body).into_response();
        let headers = response.headers_mut();
        match HeaderValue::from_str(&self.media_type) {
            Ok(value) => {
                headers.insert(header::CONTENT_TYPE, value);
            }
            Err(err) => {
                tracing::warn!(media_type = %self.media_type, error = %err, "Media type is not a valid header value");
            }
        }
        if let Some(deprecation) = &self.deprecation {
            deprecation_headers(deprecation, headers);
        }
        response
    }
}

/// Write `Deprecation`, `Sunset`, `Warning` and `Link` for a deprecated route.
pub fn deprecation_headers(deprecation: &Deprecation, headers: &mut HeaderMap) {
    headers.insert(DEPRECATION, HeaderValue::from_static("true"));

    let optional = [
        (SUNSET, deprecation.sunset_http_date()),
        (header::WARNING, Some(deprecation.warning())),
        (header::LINK, deprecation.link()),
    ];
    for (name, value) in optional {
        let Some(value) = value else { continue };
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(err) => tracing::warn!(header = %name, error = %err, "Skipping invalid header value"),
        }
    }
}
