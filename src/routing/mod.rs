//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, Accept)
//!     → table.rs (path lookup, negotiation)
//!     → media_type.rs (Accept parsing, range matching)
//!     → Return: matched Route or NotFound / NotAcceptable
//!
//! Route Compilation (at startup):
//!     Route[]
//!     → Group by path, keep registration order
//!     → Reject duplicates, require one default per path
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Versions are distinct table entries, not framework overloads
//! - Deterministic: same (path, Accept) always resolves to the same route
//! - Explicit NotAcceptable rather than a silently chosen version

pub mod deprecation;
pub mod media_type;
pub mod table;

pub use deprecation::Deprecation;
pub use table::{NegotiationError, Route, RouteDoc, RouteError, RouteTable, RouteTableBuilder};
