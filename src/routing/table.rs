//! Route table keyed by (path, media type).
//!
//! # Responsibilities
//! - Reject duplicate (path, media type) registrations at startup
//! - Require exactly one default route per path
//! - Resolve a request path and `Accept` header to one route
//!
//! # Negotiation
//! ```text
//! Accept absent/empty        → path default
//! Accept present             → per route: quality of the most specific range
//!                              (exact media type beats wildcards; wildcards
//!                              only apply to the path default)
//!                            → highest quality > 0 wins
//!                            → ties go to the earliest registered route
//! nothing acceptable         → NotAcceptable
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::handlers::Handler;
use crate::routing::deprecation::Deprecation;
use crate::routing::media_type::{parse_accept, MediaRange};

/// Startup-time route registration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("duplicate route for {path} producing {media_type}")]
    Duplicate { path: String, media_type: String },

    #[error("no default route registered for {0}")]
    MissingDefault(String),

    #[error("conflicting default routes for {path}: {first} and {second}")]
    ConflictingDefault {
        path: String,
        first: String,
        second: String,
    },
}

/// Request-time resolution failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("no route for {0}")]
    NotFound(String),

    #[error("no acceptable representation for {path}: {requested}")]
    NotAcceptable { path: String, requested: String },
}

impl NegotiationError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            NegotiationError::NotFound(_) => "not_found",
            NegotiationError::NotAcceptable { .. } => "not_acceptable",
        }
    }
}

/// How a route appears in the published API document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDoc {
    pub summary: Option<String>,
    /// Optional query parameters, all strings.
    pub query_params: Vec<String>,
    /// Component name and JSON Schema of the response body.
    pub schema: Option<(String, Value)>,
}

impl RouteDoc {
    /// Describe a route returning the `name` component schema.
    pub fn new(summary: impl Into<String>, name: impl Into<String>, schema: Value) -> Self {
        Self {
            summary: Some(summary.into()),
            query_params: Vec::new(),
            schema: Some((name.into(), schema)),
        }
    }

    /// Declare an optional string query parameter.
    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_params.push(name.into());
        self
    }
}

/// One registered handler.
#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub media_type: String,
    /// Logical resource used for metrics labels.
    pub resource: String,
    pub is_default: bool,
    pub deprecation: Option<Deprecation>,
    pub doc: RouteDoc,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// Register `handler` for `path` producing `media_type`. The path loses a trailing `/`.
    pub fn new(
        path: impl Into<String>,
        media_type: impl Into<String>,
        resource: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Self {
        Self {
            path: normalize(&path.into()).to_string(),
            media_type: media_type.into(),
            resource: resource.into(),
            is_default: false,
            deprecation: None,
            doc: RouteDoc::default(),
            handler: Arc::new(handler),
        }
    }

    /// Serve this route when the request carries no `Accept` header.
    pub fn default_for_path(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Attach deprecation metadata, rendered as response headers.
    pub fn deprecated(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = Some(deprecation);
        self
    }

    /// Attach the API document description.
    pub fn documented(mut self, doc: RouteDoc) -> Self {
        self.doc = doc;
        self
    }

    /// The handler serving this route.
    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("media_type", &self.media_type)
            .field("resource", &self.resource)
            .field("is_default", &self.is_default)
            .field("deprecation", &self.deprecation)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Routes sharing one path, in registration order.
#[derive(Debug)]
struct PathRoutes {
    routes: Vec<Route>,
    default: usize,
}

/// Collects routes and validates them into a [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    /// Queue a route; checks run in `build`.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Group routes by path and check uniqueness and defaults.
    pub fn build(self) -> Result<RouteTable, RouteError> {
        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<Route>> = HashMap::new();

        for route in self.routes {
            let siblings = grouped.entry(route.path.clone()).or_insert_with(|| {
                order.push(route.path.clone());
                Vec::new()
            });
            if siblings
                .iter()
                .any(|r| r.media_type.eq_ignore_ascii_case(&route.media_type))
            {
                return Err(RouteError::Duplicate {
                    path: route.path,
                    media_type: route.media_type,
                });
            }
            siblings.push(route);
        }

        let mut paths = HashMap::with_capacity(grouped.len());
        for (path, routes) in grouped {
            let mut defaults = routes.iter().enumerate().filter(|(_, r)| r.is_default);
            let default = match (defaults.next(), defaults.next()) {
                (Some((idx, _)), None) => idx,
                (Some((_, first)), Some((_, second))) => {
                    return Err(RouteError::ConflictingDefault {
                        path,
                        first: first.media_type.clone(),
                        second: second.media_type.clone(),
                    });
                }
                (None, _) => return Err(RouteError::MissingDefault(path)),
            };
            paths.insert(path, PathRoutes { routes, default });
        }

        Ok(RouteTable { paths, order })
    }
}

/// Immutable route table shared by all requests.
#[derive(Debug)]
pub struct RouteTable {
    paths: HashMap<String, PathRoutes>,
    order: Vec<String>,
}

impl RouteTable {
    /// Start an empty builder.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Resolve the route serving `path` for the given `Accept` header.
    pub fn resolve(&self, path: &str, accept: Option<&str>) -> Result<&Route, NegotiationError> {
        let path = normalize(path);
        let entry = self
            .paths
            .get(path)
            .ok_or_else(|| NegotiationError::NotFound(path.to_string()))?;

        let Some(header) = accept.map(str::trim).filter(|h| !h.is_empty()) else {
            return Ok(&entry.routes[entry.default]);
        };

        let ranges = parse_accept(header);
        let mut best: Option<(usize, f32)> = None;
        for (idx, route) in entry.routes.iter().enumerate() {
            let Some(quality) = quality_for(&ranges, &route.media_type, idx == entry.default)
            else {
                continue;
            };
            if quality > 0.0 && best.map_or(true, |(_, q)| quality > q) {
                best = Some((idx, quality));
            }
        }

        best.map(|(idx, _)| &entry.routes[idx])
            .ok_or_else(|| NegotiationError::NotAcceptable {
                path: path.to_string(),
                requested: header.to_string(),
            })
    }

    /// All routes, grouped by path in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.order
            .iter()
            .filter_map(|path| self.paths.get(path))
            .flat_map(|entry| entry.routes.iter())
    }

    /// Whether any route is registered for `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(normalize(path))
    }

    /// Registered paths in registration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Quality the client assigns to `media_type`, using the most specific range.
fn quality_for(ranges: &[MediaRange], media_type: &str, allow_wildcard: bool) -> Option<f32> {
    let exact = ranges
        .iter()
        .filter(|r| !r.is_wildcard() && r.covers(media_type))
        .map(|r| r.quality)
        .reduce(f32::max);
    if exact.is_some() || !allow_wildcard {
        return exact;
    }

    // `type/*` is more specific than `*/*`.
    let by_type = ranges
        .iter()
        .filter(|r| r.is_wildcard() && !r.essence.starts_with('*') && r.covers(media_type))
        .map(|r| r.quality)
        .reduce(f32::max);
    if by_type.is_some() {
        return by_type;
    }
    ranges
        .iter()
        .filter(|r| r.is_wildcard() && r.covers(media_type))
        .map(|r| r.quality)
        .reduce(f32::max)
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}
