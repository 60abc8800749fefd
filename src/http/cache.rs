//! HTTP cache control module
//!
//! Provides the time-bucketed `ETag` validator, conditional request matching
//! and `Cache-Control` / `Date` header rendering.

use chrono::{DateTime, Utc};

use crate::config::EtagBucket;

/// `max-age` used by content-addressed (versioned) resources: one year
pub const ONE_YEAR_SECS: u32 = 31_536_000;

/// Format an instant as `MM:SS`, the stamp shown by every demo resource
pub fn minute_second(at: DateTime<Utc>) -> String {
    at.format("%M:%S").to_string()
}

/// Format an instant as an RFC 1123 HTTP date, e.g. `Tue, 14 Nov 2023 22:13:20 GMT`
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Derive the `ETag` for the given instant
///
/// The `MM:SS` stamp is truncated to the bucket boundary by replacing the
/// dropped digits with zeros, then quoted:
/// - `Minute`: `"13:27"` becomes `"13:00"`
/// - `TenSeconds`: `"13:27"` becomes `"13:20"`
pub fn derive_etag(at: DateTime<Utc>, bucket: EtagBucket) -> String {
    let stamp = minute_second(at);
    let kept = match bucket {
        EtagBucket::Minute => 3,
        EtagBucket::TenSeconds => 4,
    };
    let zeros = "0".repeat(stamp.len() - kept);
    format!("\"{}{zeros}\"", &stamp[..kept])
}

/// Check if the client's `If-None-Match` header matches the server's `ETag`
///
/// Comparison is an opaque byte-for-byte equality on the whole header value.
/// Lists, weak tags and `*` are not interpreted.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| client_etag.as_bytes() == etag.as_bytes())
}

/// Cache-Control directive set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub private: bool,
    pub must_revalidate: bool,
    pub max_age: Option<u32>,
    pub immutable: bool,
}

impl CacheControl {
    pub const fn private() -> Self {
        Self {
            private: true,
            must_revalidate: false,
            max_age: None,
            immutable: false,
        }
    }

    pub const fn must_revalidate() -> Self {
        Self {
            private: false,
            must_revalidate: true,
            max_age: None,
            immutable: false,
        }
    }

    pub const fn max_age(secs: u32) -> Self {
        Self {
            private: false,
            must_revalidate: false,
            max_age: Some(secs),
            immutable: false,
        }
    }

    pub const fn immutable() -> Self {
        Self {
            private: false,
            must_revalidate: false,
            max_age: None,
            immutable: true,
        }
    }

    /// Add the `immutable` directive
    pub const fn and_immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        let mut directives = Vec::with_capacity(4);
        if self.private {
            directives.push("private".to_string());
        }
        if self.must_revalidate {
            directives.push("must-revalidate".to_string());
        }
        if let Some(max_age) = self.max_age {
            directives.push(format!("max-age={max_age}"));
        }
        if self.immutable {
            directives.push("immutable".to_string());
        }
        directives.join(", ")
    }
}
