//! HTTP protocol layer module
//!
//! Validator derivation, conditional request matching, header formatting and
//! response builders, decoupled from the demo routes that use them.

pub mod cache;
pub mod response;

// Re-export commonly used items
pub use cache::{check_etag_match, derive_etag, format_http_date, minute_second};
pub use response::{build_304_response, build_content_response};
