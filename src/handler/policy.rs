//! Cache-policy variants
//!
//! Each variant fixes the headers it emits, whether it computes a validator
//! and which element of the home page its stylesheet stamps.

use crate::config::DemoConfig;
use crate::http::cache::{CacheControl, ONE_YEAR_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyVariant {
    PlainHtml,
    Immutable,
    Etag,
    EtagImmutable,
    MaxAge,
    MaxAgeImmutable,
    MaxAgeImmutableVersioned,
}

impl PolicyVariant {
    /// Path prefix of the versioned stylesheet; the Unix timestamp follows
    pub const VERSIONED_PREFIX: &'static str = "/max-age-and-immutable-versioned";

    /// Every stylesheet variant, in home page order
    pub const STYLESHEETS: [Self; 6] = [
        Self::Immutable,
        Self::Etag,
        Self::EtagImmutable,
        Self::MaxAge,
        Self::MaxAgeImmutable,
        Self::MaxAgeImmutableVersioned,
    ];

    /// Short name used in logs and page labels
    pub const fn name(self) -> &'static str {
        match self {
            Self::PlainHtml => "html",
            Self::Immutable => "immutable",
            Self::Etag => "etag",
            Self::EtagImmutable => "etag-and-immutable",
            Self::MaxAge => "max-age",
            Self::MaxAgeImmutable => "max-age-and-immutable",
            Self::MaxAgeImmutableVersioned => "max-age-and-immutable-versioned",
        }
    }

    /// Id of the home page element whose `::before` content the stylesheet sets
    pub fn element_id(self) -> String {
        format!("{}-timestamp", self.name())
    }

    pub fn cache_control(self, demo: &DemoConfig) -> CacheControl {
        match self {
            Self::PlainHtml => CacheControl::private(),
            Self::Immutable => CacheControl::immutable(),
            Self::Etag => CacheControl::must_revalidate(),
            Self::EtagImmutable => CacheControl::must_revalidate().and_immutable(),
            Self::MaxAge => CacheControl::max_age(demo.max_age),
            Self::MaxAgeImmutable => CacheControl::max_age(demo.max_age).and_immutable(),
            Self::MaxAgeImmutableVersioned => CacheControl::max_age(ONE_YEAR_SECS).and_immutable(),
        }
    }

    /// Whether the variant answers conditional requests with an `ETag`
    pub const fn uses_validator(self) -> bool {
        matches!(self, Self::Etag | Self::EtagImmutable)
    }

    /// Whether the response carries `Date` and `Age: 0`
    pub const fn stamps_date(self) -> bool {
        !matches!(self, Self::PlainHtml)
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::PlainHtml => "text/html",
            _ => "text/css",
        }
    }
}

impl std::fmt::Display for PolicyVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
