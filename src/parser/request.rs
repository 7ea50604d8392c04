//! HTTP request parsing and representation.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Represents an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method (GET, HEAD, ...)
    pub method: Method,
    /// The request target, not yet resolved against the filesystem
    pub target: String,
    /// The protocol token
    pub version: HttpVersion,
    /// The HTTP headers, ordered by name; a repeated name keeps its last value
    pub headers: BTreeMap<String, String>,
    /// The lines that followed the header block
    pub body: Vec<String>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `target` - The request target
    /// * `version` - The protocol token
    /// * `headers` - The HTTP headers
    ///
    /// # Returns
    ///
    /// A new HTTP request with an empty body
    pub fn new(
        method: Method,
        target: impl Into<String>,
        version: HttpVersion,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            method,
            target: target.into(),
            version,
            headers,
            body: Vec::new(),
        }
    }

    /// Create a new HTTP request with body lines.
    pub fn with_body(
        method: Method,
        target: impl Into<String>,
        version: HttpVersion,
        headers: BTreeMap<String, String>,
        body: Vec<String>,
    ) -> Self {
        let mut request = Self::new(method, target, version, headers);
        request.body = body;
        request
    }

    /// Get a header value.
    ///
    /// Header names are stored exactly as received, so the lookup is
    /// case-sensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.method, self.target, self.version)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}: {value}")?;
        }
        f.write_str("\r\n")?;
        for line in &self.body {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Read and parse an HTTP request from a buffered stream.
///
/// The request line and the header block are read until the first empty line
/// or the end of the stream. Body lines are then collected only while input is
/// already available: the parser never waits for a body the client has not
/// sent yet, not even the rest of a line, and a failure while reading the body
/// only ends the body.
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request line or a header line
/// is invalid. Nothing is returned for a request that failed part way.
pub async fn read_request<R>(reader: &mut R) -> Result<HttpRequest, Error>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = next_line(reader).await?.ok_or(Error::EmptyRequest)?;
    let (method, target, version) = parse_request_line(&request_line)?;

    let mut headers = BTreeMap::new();
    while let Some(line) = next_line(reader).await? {
        if line.is_empty() {
            break;
        }
        let (name, value) = parse_header_line(&line)?;
        headers.insert(name, value);
    }

    let mut body = Vec::new();
    let mut pending = Vec::new();
    while let Some(chunk) = take_available(reader).await {
        pending.extend_from_slice(&chunk);
        if pending.ends_with(b"\n") {
            body.push(decode_line(&pending));
            pending.clear();
        }
    }
    // A last line without terminator is kept as it stands
    if !pending.is_empty() {
        body.push(decode_line(&pending));
    }

    Ok(HttpRequest::with_body(method, target, version, headers, body))
}

/// Parse an HTTP request from a byte slice.
///
/// Applies the same grammar as [`read_request`]; since the whole input is
/// already available, every line after the blank line is a body line.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let mut lines = input.split_inclusive(|&b| b == b'\n').map(decode_line);

    let request_line = lines.next().ok_or(Error::EmptyRequest)?;
    let (method, target, version) = parse_request_line(&request_line)?;

    let mut headers = BTreeMap::new();
    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        let (name, value) = parse_header_line(&line)?;
        headers.insert(name, value);
    }

    let body = lines.collect();
    Ok(HttpRequest::with_body(method, target, version, headers, body))
}

/// Split a request line into method, target and protocol token.
fn parse_request_line(line: &str) -> Result<(Method, String, HttpVersion), Error> {
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    let &[method, target, protocol] = parts.as_slice() else {
        return Err(Error::MalformedRequestLine(line.to_string()));
    };

    let version = protocol.parse::<HttpVersion>()?;
    Ok((Method::from(method), target.to_string(), version))
}

/// Split a header line on the first `": "`.
fn parse_header_line(line: &str) -> Result<(String, String), Error> {
    line.split_once(": ")
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| Error::MalformedHeader(line.to_string()))
}

/// Read one line, without its terminator. `None` at the end of the stream.
async fn next_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(decode_line(&buf)))
}

/// Take the bytes the reader holds right now, up to and including the first
/// `\n`. `None` once nothing is ready without waiting on the peer, at the end
/// of the stream, or on a read error.
async fn take_available<R>(reader: &mut R) -> Option<Vec<u8>>
where
    R: AsyncBufRead + Unpin,
{
    let chunk = tokio::select! {
        biased;
        filled = reader.fill_buf() => match filled {
            Ok(buf) if !buf.is_empty() => {
                let end = buf
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(buf.len(), |i| i + 1);
                buf[..end].to_vec()
            }
            Ok(_) => return None,
            Err(e) => {
                debug!("Stopped reading request body: {e}");
                return None;
            }
        },
        () = std::future::ready(()) => return None,
    };

    reader.consume(chunk.len());
    Some(chunk)
}

fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
