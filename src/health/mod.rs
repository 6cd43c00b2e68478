//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoints (endpoints.rs):
//!     GET /actuator/health, /actuator/health/{liveness,readiness}, /actuator/info
//!     → read state.rs
//!
//! State (state.rs):
//!     UP → OUT_OF_SERVICE when shutdown begins
//! ```
//!
//! # Design Decisions
//! - Liveness is always UP while the process serves requests
//! - Readiness flips before draining so load balancers stop routing first
//! - A not-ready check answers 503

pub mod endpoints;
pub mod state;

pub use state::{HealthState, Status};
