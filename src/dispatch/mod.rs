//! Versioned endpoint dispatch.
//!
//! # Data Flow
//! ```text
//! DispatchRequest (path, Accept, query, correlation id)
//!     → RouteTable::resolve            (404 / 406 on failure)
//!     → metrics: request counter        (once, per resource)
//!     → Handler::handle                 (panics caught here)
//!     → metrics: duration + outcome     (once)
//!     → Dispatched { body, media_type, deprecation } or DispatchError
//! ```
//!
//! # Design Decisions
//! - Synchronous: handlers never await, so dispatch never suspends
//! - Framework independent; the HTTP layer only adapts in and out
//! - Every failure is categorized here, nothing is swallowed

pub mod dispatcher;
pub mod error;

pub use dispatcher::{DispatchRequest, Dispatched, Dispatcher};
pub use error::DispatchError;
