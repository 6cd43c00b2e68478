//! Departing resource: the current `depart` endpoint and its legacy twin
//! still mounted under the greeting base path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::clock::Clock;
use super::{to_body, Handler, HandlerError, HandlerRequest};

/// Fixed farewell text.
pub const FAREWELL: &str = "Goodbye";

/// `MM/dd/yyyy HH:mm:ss:SSS` in chrono notation.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S:%3f";

/// Departure representation. `date` serializes as `null` on the legacy route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    pub text: String,
    pub date: Option<String>,
}

/// JSON Schema of [`Departure`].
pub fn departure_schema() -> Value {
    json!({
        "type": "object",
        "required": ["text", "date"],
        "properties": {
            "text": { "type": "string", "example": FAREWELL },
            "date": {
                "type": "string",
                "nullable": true,
                "description": "Local time as MM/dd/yyyy HH:mm:ss:SSS, null on the legacy route",
                "example": "04/05/2025 09:07:03:042"
            }
        }
    })
}

/// Legacy `depart`: no timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDepart;

impl Handler for LegacyDepart {
    fn handle(&self, _request: &HandlerRequest<'_>) -> Result<Value, HandlerError> {
        to_body(&Departure {
            text: FAREWELL.to_string(),
            date: None,
        })
    }
}

/// Current `depart`: stamps the local time of each request.
#[derive(Clone)]
pub struct Depart {
    clock: Arc<dyn Clock>,
}

impl Depart {
    /// Farewell stamped with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Handler for Depart {
    fn handle(&self, _request: &HandlerRequest<'_>) -> Result<Value, HandlerError> {
        let date = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        tracing::debug!(date = %date, "Departing");
        to_body(&Departure {
            text: FAREWELL.to_string(),
            date: Some(date),
        })
    }
}
