//! Request handler module
//!
//! Dispatches each request to its cache-policy variant and renders the
//! demo resources.

pub mod policy;
pub mod responder;
pub mod router;
pub mod templates;

// Re-export main entry point
pub use policy::PolicyVariant;
pub use router::handle_request;
