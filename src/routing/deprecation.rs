//! Deprecation metadata attached to routes.
//!
//! Values are fixed at registration time and rendered into the
//! `Deprecation`, `Sunset` (RFC 8594), `Warning` and `Link` response headers.

use chrono::NaiveDate;

/// Lifecycle information for a deprecated route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    /// Release in which the route was deprecated.
    pub since: String,
    /// Date after which the route is removed.
    pub sunset: Option<NaiveDate>,
    /// Whether the route is scheduled for removal.
    pub for_removal: bool,
    /// Route clients should migrate to.
    pub successor: Option<String>,
    /// Media type of the successor representation, when it differs by version only.
    pub successor_type: Option<String>,
}

impl Deprecation {
    /// Deprecated as of release `version`.
    pub fn since(version: impl Into<String>) -> Self {
        Self {
            since: version.into(),
            sunset: None,
            for_removal: false,
            successor: None,
            successor_type: None,
        }
    }

    /// Date the route goes away, if one is announced.
    pub fn with_sunset(mut self, sunset: Option<NaiveDate>) -> Self {
        self.sunset = sunset;
        self
    }

    /// Mark the route as scheduled for removal.
    pub fn for_removal(mut self) -> Self {
        self.for_removal = true;
        self
    }

    /// Path clients should call instead.
    pub fn with_successor(mut self, successor: impl Into<String>) -> Self {
        self.successor = Some(successor.into());
        self
    }

    /// Media type clients should request instead.
    pub fn with_successor_type(mut self, media_type: impl Into<String>) -> Self {
        self.successor_type = Some(media_type.into());
        self
    }

    /// Sunset as an IMF-fixdate, midnight UTC.
    pub fn sunset_http_date(&self) -> Option<String> {
        self.sunset
            .map(|date| date.format("%a, %d %b %Y 00:00:00 GMT").to_string())
    }

    /// Value for the `Warning` header (code 299, miscellaneous persistent warning).
    pub fn warning(&self) -> String {
        let mut text = format!("Deprecated since {}", self.since);
        if self.for_removal {
            text.push_str(", scheduled for removal");
        }
        if let Some(sunset) = self.sunset {
            text.push_str(&format!(" on {}", sunset.format("%Y-%m-%d")));
        }
        match (&self.successor, &self.successor_type) {
            (Some(successor), Some(media_type)) => {
                text.push_str(&format!("; use {successor} with {media_type} instead"));
            }
            (Some(successor), None) => text.push_str(&format!("; use {successor} instead")),
            (None, Some(media_type)) => text.push_str(&format!("; use {media_type} instead")),
            (None, None) => {}
        }
        format!("299 - \"{text}\"")
    }

    /// Value for the `Link` header pointing at the successor.
    pub fn link(&self) -> Option<String> {
        let successor = self.successor.as_ref()?;
        Some(match &self.successor_type {
            Some(media_type) => {
                format!("<{successor}>; rel=\"successor-version\"; type=\"{media_type}\"")
            }
            None => format!("<{successor}>; rel=\"successor-version\""),
        })
    }
}
