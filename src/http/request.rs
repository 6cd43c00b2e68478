//! Request-side plumbing.
//!
//! # Responsibilities
//! - Assign a correlation id (UUID v4) when the client sent none
//! - Echo the correlation id on every response
//! - Expose the id to handlers as an extractor
//! - Decode the query string into dispatch parameters
//!
//! # Design Decisions
//! - Correlation id set as the outermost layer so every span and log carries it
//! - A client-supplied id is kept verbatim

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, Uri};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::dispatch::DispatchError;

/// Header carrying the correlation id.
pub const X_CORRELATION_ID: &str = "x-correlation-id";

fn header_name() -> HeaderName {
    HeaderName::from_static(X_CORRELATION_ID)
}

/// Layer that generates a correlation id for requests without one.
pub fn set_correlation_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(header_name(), MakeRequestUuid)
}

/// Layer that copies the request's correlation id onto the response.
pub fn propagate_correlation_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header_name())
}

/// Correlation id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// Read the id set by [`set_correlation_id_layer`].
    pub fn from_parts(parts: &Parts) -> Self {
        Self::from_headers(&parts.headers)
    }

    /// Read the id from request headers, or `"unknown"` outside the layer.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(X_CORRELATION_ID)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        Self(id)
    }

    /// The id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Decode the query string strictly. Repeated keys keep the last value.
///
/// A `%` not followed by two hex digits, or an escape sequence that does not
/// decode to UTF-8, is a validation error rather than being passed through.
pub fn query_params(uri: &Uri) -> Result<HashMap<String, String>, DispatchError> {
    let Some(query) = uri.query() else {
        return Ok(HashMap::new());
    };

    let mut params = HashMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(params)
}

fn decode_component(raw: &str) -> Result<String, DispatchError> {
    let bytes = raw.as_bytes();
    for (idx, _) in raw.match_indices('%') {
        let well_formed = bytes
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(DispatchError::Validation {
                message: format!("malformed percent-encoding in query component '{raw}'"),
            });
        }
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DispatchError::Validation {
            message: format!("query component '{raw}' is not valid UTF-8"),
        })
}
