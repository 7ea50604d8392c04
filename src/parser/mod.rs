//! HTTP request parser module.
//!
//! This module turns the inbound bytes of a connection into an [`HttpRequest`],
//! or into an [`Error`] describing why the request was rejected. A request is
//! either fully parsed or not produced at all.

mod request;
mod method;
mod version;
mod error;
mod tests;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

// Re-export the parse functions
pub use request::{parse_request, read_request};
