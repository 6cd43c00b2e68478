//! Errors surfaced at the dispatch boundary.

use axum::http::StatusCode;
use thiserror::Error;

use crate::handlers::HandlerError;
use crate::routing::NegotiationError;

/// Every way a request can fail, resolved into one HTTP status.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route is registered for the path.
    #[error("No route found for {path}")]
    NotFound { path: String },

    /// The path exists but produces none of the requested media types.
    #[error("Could not find acceptable representation: {requested}")]
    NotAcceptable { path: String, requested: String },

    /// Method other than GET/HEAD on a dispatched path.
    #[error("Request method '{method}' is not supported")]
    MethodNotAllowed { method: String },

    /// Malformed request input, e.g. an undecodable query string.
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// The request outlived `timeouts.request_secs`.
    #[error("Request did not complete within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The handler failed or panicked.
    #[error("Handler failed for {path}: {source}")]
    Internal {
        path: String,
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// HTTP status answered for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Validation { .. } => StatusCode::BAD_REQUEST,
            DispatchError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            DispatchError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            DispatchError::Internal { .. } => "Unexpected error while handling request".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<NegotiationError> for DispatchError {
    fn from(err: NegotiationError) -> Self {
        match err {
            NegotiationError::NotFound(path) => DispatchError::NotFound { path },
            NegotiationError::NotAcceptable { path, requested } => {
                DispatchError::NotAcceptable { path, requested }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_acceptable = DispatchError::from(NegotiationError::NotAcceptable {
            path: "/flip/greeting/greet".into(),
            requested: "application/json".into(),
        });
        assert_eq!(not_acceptable.status(), StatusCode::NOT_ACCEPTABLE);
        assert!(not_acceptable.public_message().contains("application/json"));

        let not_found = DispatchError::from(NegotiationError::NotFound("/x".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = DispatchError::Internal {
            path: "/flip/greeting/greet".into(),
            source: HandlerError::Panicked("secret detail".into()),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("secret"));
        assert!(err.to_string().contains("secret detail"));
    }

    #[test]
    fn test_timeout_is_request_timeout() {
        let err = DispatchError::Timeout { timeout_ms: 30_000 };
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.public_message(), "Request did not complete within 30000 ms");
    }
}
