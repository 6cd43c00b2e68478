//! Greeting resource: `greet` v1 (counted, deprecated) and v2 (current).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{to_body, Handler, HandlerError, HandlerRequest};

/// Name used when the `name` query parameter is absent or empty.
pub const DEFAULT_NAME: &str = "World";

/// Render the greeting text.
pub fn greeting_text(name: &str) -> String {
    format!("Hello, {name}!")
}

/// Process-wide sequence for v1 greetings.
///
/// Starts at 0; the first v1 request observes 1. Never persisted.
#[derive(Debug, Default)]
pub struct GreetingCounter {
    value: AtomicU64,
}

impl GreetingCounter {
    /// A counter that has handed out nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically increment and return the new value.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last value handed out.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

/// v1 representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingV1 {
    pub sequence: u64,
    pub text: String,
}

/// v2 representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingV2 {
    pub text: String,
}

/// JSON Schema of [`GreetingV1`].
pub fn v1_schema() -> Value {
    json!({
        "type": "object",
        "required": ["sequence", "text"],
        "properties": {
            "sequence": { "type": "integer", "format": "int64", "minimum": 1 },
            "text": { "type": "string", "example": "Hello, World!" }
        }
    })
}

/// JSON Schema of [`GreetingV2`].
pub fn v2_schema() -> Value {
    json!({
        "type": "object",
        "required": ["text"],
        "properties": {
            "text": { "type": "string", "example": "Hello, World!" }
        }
    })
}

/// `greet` v1: increments the shared counter.
#[derive(Debug, Clone)]
pub struct GreetV1 {
    counter: Arc<GreetingCounter>,
}

impl GreetV1 {
    /// Greet using the shared sequence.
    pub fn new(counter: Arc<GreetingCounter>) -> Self {
        Self { counter }
    }
}

impl Handler for GreetV1 {
    fn handle(&self, request: &HandlerRequest<'_>) -> Result<Value, HandlerError> {
        let name = request.param_or("name", DEFAULT_NAME);
        let sequence = self.counter.next();
        tracing::debug!(sequence, name = %name, "Greeting v1 generated");
        to_body(&GreetingV1 {
            sequence,
            text: greeting_text(name),
        })
    }
}

/// `greet` v2: stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetV2;

impl Handler for GreetV2 {
    fn handle(&self, request: &HandlerRequest<'_>) -> Result<Value, HandlerError> {
        let name = request.param_or("name", DEFAULT_NAME);
        let text = greeting_text(name);
        tracing::debug!(greeting = %text, "Greeting v2 generated");
        to_body(&GreetingV2 { text })
    }
}
