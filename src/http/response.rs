//! HTTP response building module
//!
//! Builders for the two response shapes the demo emits: a full cacheable
//! resource (200) and a bare 304 Not Modified.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 304 Not Modified response
///
/// No headers are attached: the client keeps the ones it cached with the
/// original 200.
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 200 response carrying a cache policy
///
/// When `date` is set the response is stamped with `Date` and `Age: 0`.
/// When `etag` is set it is attached as the `Etag` validator.
pub fn build_content_response(
    content: String,
    content_type: &str,
    cache_control: &str,
    date: Option<&str>,
    etag: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    let mut builder = Response::builder()
        .status(200)
        .header("Cache-Control", cache_control);

    if let Some(date) = date {
        builder = builder.header("Age", "0").header("Date", date);
    }

    builder = builder
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(etag) = etag {
        builder = builder.header("Etag", etag);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
