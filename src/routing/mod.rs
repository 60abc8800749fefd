//! Routing module
//!
//! Table-driven dispatch from request path to cache-policy variant.

mod table;

pub use table::{PathPattern, RouteTable};
