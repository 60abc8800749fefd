//! Cache-Policy Responder
//!
//! Turns a resolved variant plus the request's conditional headers into a
//! response. The only branch is 200 vs 304 for validator variants.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::policy::PolicyVariant;
use super::router::RequestContext;
use super::templates;
use crate::clock::Clock;
use crate::config::DemoConfig;
use crate::http;

/// Build the response for `variant`
pub fn respond(
    variant: PolicyVariant,
    ctx: &RequestContext<'_>,
    clock: &dyn Clock,
    demo: &DemoConfig,
) -> Response<Full<Bytes>> {
    let now = clock.now();

    let etag = variant
        .uses_validator()
        .then(|| http::derive_etag(now, demo.etag_bucket));

    if let Some(etag) = &etag {
        if http::check_etag_match(ctx.if_none_match.as_deref(), etag) {
            return http::build_304_response();
        }
    }

    let body = match variant {
        PolicyVariant::PlainHtml => templates::render_home(now, demo),
        PolicyVariant::MaxAgeImmutableVersioned => {
            templates::render_css(&variant.element_id(), versioned_stamp(&ctx.path, now))
        }
        _ => templates::render_css(&variant.element_id(), now),
    };

    let date = variant.stamps_date().then(|| http::format_http_date(now));

    http::build_content_response(
        body,
        variant.content_type(),
        &variant.cache_control(demo).to_header_value(),
        date.as_deref(),
        etag.as_deref(),
        ctx.is_head,
    )
}

/// Instant encoded in a versioned path such as
/// `/max-age-and-immutable-versioned-1700000000.css`
///
/// The `.css` suffix is stripped and the segment after the last `-` is read
/// as Unix seconds. Anything unparsable yields `now`.
pub fn versioned_stamp(path: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let stem = path.strip_suffix(".css").unwrap_or(path);
    let segment = stem.rsplit('-').next().unwrap_or(stem);

    segment
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(now)
}
