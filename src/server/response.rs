//! HTTP response types and utilities.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use log::error;

/// Protocol token written on every status line.
pub const PROTOCOL: &str = "HTTP/1.0";

/// HTTP status codes the server produces, with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    NotFound = 404,
    NotImplemented = 501,
}

impl StatusCode {
    /// Get the numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Content types the server labels its bodies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Text,
}

impl ContentType {
    /// `text/html` for `.htm` and `.html` files, `text/plain` otherwise.
    pub fn for_path(path: &Path) -> Self {
        let is_html = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| name.ends_with(".htm") || name.ends_with(".html"));

        if is_html {
            ContentType::Html
        } else {
            ContentType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Text => "text/plain",
        }
    }
}

/// Represents an HTTP response.
///
/// A `Date` header is set when the response is created. Whenever a body is
/// attached through [`HttpResponse::with_html_body`] or
/// [`HttpResponse::from_file`], `Content-Length` is set to its byte length.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code and no body.
    pub fn new(status: StatusCode) -> Self {
        let mut response = Self {
            status,
            headers: BTreeMap::new(),
            body: None,
        };
        response.set_date(SystemTime::now());
        response
    }

    /// Build a response serving the file at `path`.
    ///
    /// A path that does not name a regular file yields a `404 Not Found`
    /// with an HTML body naming the path. A file that exists but cannot be
    /// read is logged and answered with a `200 OK` without body.
    pub async fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let is_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Self::not_found(path);
        }

        Self::new(StatusCode::Ok).with_file_contents(path, tokio::fs::read(path).await)
    }

    /// Attach the outcome of reading `path` to a response.
    ///
    /// A read error is logged and leaves the response without body or
    /// `Content-Length`.
    pub(crate) fn with_file_contents(mut self, path: &Path, contents: io::Result<Vec<u8>>) -> Self {
        match contents {
            Ok(contents) => {
                self.set_content_length(contents.len());
                self.set_content_type(ContentType::for_path(path));
                self.body = Some(contents);
            }
            Err(e) => error!("Error while reading {}: {e}", path.display()),
        }
        self
    }

    /// Build a response carrying an HTML message.
    pub fn from_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status).with_html_body(message)
    }

    /// `404 Not Found` naming the requested path.
    pub fn not_found(path: &Path) -> Self {
        Self::from_message(
            StatusCode::NotFound,
            format!("<html><body>File {} not found.</body></html>", path.display()),
        )
    }

    /// Set an HTML message as the response body.
    pub fn with_html_body(mut self, message: impl Into<String>) -> Self {
        let body = message.into().into_bytes();
        self.set_content_length(body.len());
        self.set_content_type(ContentType::Html);
        self.body = Some(body);
        self
    }

    /// Drop the body while keeping the headers that describe it.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    pub fn set_date(&mut self, date: SystemTime) {
        self.headers.insert("Date".to_string(), httpdate::fmt_http_date(date));
    }

    pub fn set_content_length(&mut self, length: usize) {
        self.headers.insert("Content-Length".to_string(), length.to_string());
    }

    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.headers.insert("Content-Type".to_string(), content_type.as_str().to_string());
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Convert the response to the bytes written on the wire.
    ///
    /// Headers are written in descending name order, each line ends with a
    /// bare `\n`, and the header block is closed by `\r\n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        // Add the status line
        let status_line = format!("{PROTOCOL} {}\n", self.status);
        bytes.extend_from_slice(status_line.as_bytes());

        // Add the headers
        for (name, value) in self.headers.iter().rev() {
            let header_line = format!("{name}: {value}\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\r\n");

        // Add the body
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }

        bytes
    }
}
