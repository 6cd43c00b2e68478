//! Vendor media types and `Accept` header parsing.
//!
//! # Responsibilities
//! - Build vendor media types (`application/vnd.<ns>.<resource>.v<N>+json`)
//! - Parse an `Accept` header into ordered media ranges with quality
//!
//! # Design Decisions
//! - Media type comparison is ASCII case-insensitive (RFC 9110)
//! - Parameters other than `q` are ignored for matching
//! - `q=0` entries are kept but never match (explicit "not acceptable")
//! - Entries with an unparsable `q` are dropped

/// The wildcard range matching any media type.
pub const ANY: &str = "*/*";

/// Build a versioned vendor media type.
///
/// ```
/// use greeting_service::routing::media_type::vendor;
/// assert_eq!(
///     vendor("flipfoundry", "greeting", 2),
///     "application/vnd.flipfoundry.greeting.v2+json"
/// );
/// ```
pub fn vendor(namespace: &str, resource: &str, version: u32) -> String {
    format!("application/vnd.{namespace}.{resource}.v{version}+json")
}

/// One entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    /// Lowercased `type/subtype`, without parameters.
    pub essence: String,
    /// Quality in `[0.0, 1.0]`.
    pub quality: f32,
}

impl MediaRange {
    /// True for `*/*` and `type/*` ranges.
    pub fn is_wildcard(&self) -> bool {
        self.essence == ANY || self.essence.ends_with("/*")
    }

    /// Whether this range names the given concrete media type, ignoring quality.
    pub fn covers(&self, media_type: &str) -> bool {
        if self.essence == ANY {
            return true;
        }
        if let Some(prefix) = self.essence.strip_suffix("/*") {
            return media_type
                .split_once('/')
                .map(|(ty, _)| ty.eq_ignore_ascii_case(prefix))
                .unwrap_or(false);
        }
        self.essence.eq_ignore_ascii_case(media_type)
    }

    /// Whether this range accepts the given media type (`q > 0`).
    pub fn accepts(&self, media_type: &str) -> bool {
        self.quality > 0.0 && self.covers(media_type)
    }
}

/// Parse an `Accept` header value into media ranges, preserving order.
///
/// Missing `q` defaults to `1.0`. Empty segments are skipped.
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .filter_map(|segment| {
            let mut parts = segment.split(';');
            let essence = parts.next()?.trim();
            if essence.is_empty() || !essence.contains('/') {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if key.trim().eq_ignore_ascii_case("q") {
                    quality = parse_quality(value.trim())?;
                }
            }

            Some(MediaRange {
                essence: essence.to_ascii_lowercase(),
                quality,
            })
        })
        .collect()
}

fn parse_quality(raw: &str) -> Option<f32> {
    let q: f32 = raw.parse().ok()?;
    if q.is_finite() && (0.0..=1.0).contains(&q) {
        Some(q)
    } else {
        None
    }
}
