//! Service health state.
//!
//! # States
//! - UP: accepting traffic
//! - OUT_OF_SERVICE: shutdown has begun, in-flight requests draining
//!
//! # State Transitions
//! ```text
//! UP → OUT_OF_SERVICE: shutdown signal observed
//! ```
//! There is no way back; a drained process exits.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Health status as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Up,
    OutOfService,
}

/// Readiness flag shared between the server and its health endpoints.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// A state that reports ready.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
        }
    }

    /// Whether the readiness group reports UP.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Stop reporting ready. Idempotent.
    pub fn mark_draining(&self) {
        if self.ready.swap(false, Ordering::SeqCst) {
            tracing::info!("Readiness set to OUT_OF_SERVICE");
        }
    }

    /// Always UP; a wedged process shows up as the check timing out.
    pub fn liveness(&self) -> Status {
        Status::Up
    }

    /// UP until [`mark_draining`](Self::mark_draining) is called.
    pub fn readiness(&self) -> Status {
        if self.is_ready() {
            Status::Up
        } else {
            Status::OutOfService
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
