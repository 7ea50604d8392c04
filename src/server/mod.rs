//! HTTP server implementation for microserve.
//!
//! This module builds responses, handles one connection per request, and
//! runs the accept loop that feeds connections to a bounded set of workers.

mod response;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{ContentType, HttpResponse, StatusCode, PROTOCOL};
pub use config::{ServerConfig, DEFAULT_SHUTDOWN_GRACE_MS};
pub use error::Error;
pub use handler::{handle_connection, resolve_target, respond_to};
pub use http_server::{HttpServer, ShutdownSummary};
