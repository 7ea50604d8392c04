//! A minimal concurrent HTTP/1.0 file server.
//!
//! Each accepted connection carries exactly one request. The request is
//! parsed, the target is resolved against a document root, and the file (or
//! a synthesized error page) is written back before the connection closes.
//!
//! # Features
//!
//! - Parse HTTP requests from a byte slice or from an async stream
//! - Serve `GET` and `HEAD` from a document root, `501` for anything else
//! - At most `max_workers` connections handled at once, the rest queue
//! - Graceful shutdown with a grace period before in-flight work is aborted
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use microserve::parse_request;
//!
//! let request_bytes = b"GET /index.html HTTP/1.0\r\nHost: example.com\r\n\r\n";
//!
//! match parse_request(request_bytes) {
//!     Ok(request) => {
//!         println!("Method: {}", request.method);
//!         println!("Target: {}", request.target);
//!         println!("Version: {}", request.version);
//!         println!("Headers: {:?}", request.headers);
//!     },
//!     Err(err) => {
//!         println!("Error parsing request: {}", err);
//!     }
//! }
//! ```
//!
//! ## Error handling
//!
//! ```
//! use microserve::{parse_request, ParserError};
//!
//! let invalid_request = b"GET /index.html FTP/1.0\r\n\r\n";
//!
//! match parse_request(invalid_request) {
//!     Ok(_) => println!("Request parsed successfully"),
//!     Err(ParserError::UnsupportedProtocol(token)) => println!("Not HTTP: {}", token),
//!     Err(ParserError::MalformedRequestLine(line)) => println!("Malformed request line: {}", line),
//!     Err(err) => println!("Other error: {}", err),
//! }
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! use microserve::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), microserve::ServerError> {
//! let config = ServerConfig::new(8080, "/var/www", 8);
//! let summary = HttpServer::new(config).start().await?;
//! println!("{} connections completed", summary.completed);
//! # Ok(())
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request, read_request};
pub use server::{
    ContentType, Error as ServerError, HttpResponse, HttpServer, ServerConfig, ShutdownSummary,
    StatusCode,
};
