//! Route table module
//!
//! Maps request paths to cache-policy variants. Patterns are checked in
//! order and the first match wins; an unmatched path falls back to the home
//! page.

use crate::handler::PolicyVariant;

/// Path matching rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Case-sensitive exact path
    Exact(&'static str),
    /// Case-sensitive path prefix
    Prefix(&'static str),
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == *p,
            Self::Prefix(p) => path.starts_with(p),
        }
    }
}

/// A (pattern, variant) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: PathPattern,
    pub variant: PolicyVariant,
}

/// Ordered route table with a fallback variant
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: PolicyVariant,
}

impl RouteTable {
    pub const fn new(routes: Vec<Route>, fallback: PolicyVariant) -> Self {
        Self { routes, fallback }
    }

    /// Resolve a path to its variant
    pub fn resolve(&self, path: &str) -> PolicyVariant {
        self.routes
            .iter()
            .find(|route| route.pattern.matches(path))
            .map_or(self.fallback, |route| route.variant)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let route = |pattern, variant| Route { pattern, variant };
        Self::new(
            vec![
                route(PathPattern::Exact("/immutable.css"), PolicyVariant::Immutable),
                route(PathPattern::Exact("/etag.css"), PolicyVariant::Etag),
                route(
                    PathPattern::Exact("/etag-and-immutable.css"),
                    PolicyVariant::EtagImmutable,
                ),
                route(PathPattern::Exact("/max-age.css"), PolicyVariant::MaxAge),
                route(
                    PathPattern::Exact("/max-age-and-immutable.css"),
                    PolicyVariant::MaxAgeImmutable,
                ),
                route(
                    PathPattern::Prefix(PolicyVariant::VERSIONED_PREFIX),
                    PolicyVariant::MaxAgeImmutableVersioned,
                ),
            ],
            PolicyVariant::PlainHtml,
        )
    }
}
