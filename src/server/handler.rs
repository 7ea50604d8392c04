//! Connection handling: one request in, at most one response out, then close.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::parser::{HttpRequest, Method, read_request};
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// Handle a single accepted connection end to end.
///
/// Reads one request, writes the response and closes the connection. A
/// request that fails to parse is answered with nothing; the connection is
/// closed all the same and the parse error is returned to the caller.
pub async fn handle_connection<S>(
    socket: S,
    peer: SocketAddr,
    document_root: &Path,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(socket);
    let result = serve_request(&mut stream, peer, document_root).await;

    // The transport itself is released when `stream` drops, even if this fails.
    if let Err(e) = stream.shutdown().await {
        error!("Error while closing client socket {peer}: {e}");
    }

    result
}

async fn serve_request<S>(
    stream: &mut BufReader<S>,
    peer: SocketAddr,
    document_root: &Path,
) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = read_request(stream).await?;
    info!(
        "Request: {target} being processed by socket at {peer}",
        target = request.target
    );
    debug!("{request}");

    let response = respond_to(&request, document_root).await;
    stream.write_all(&response.to_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

/// Build the response for a parsed request.
///
/// `GET` and `HEAD` serve the file the target names under `document_root`;
/// `HEAD` keeps the headers and drops the body. Any other method gets
/// `501 Not Implemented`.
pub async fn respond_to(request: &HttpRequest, document_root: &Path) -> HttpResponse {
    match request.method {
        Method::GET | Method::HEAD => {
            let path = resolve_target(document_root, &request.target);
            let response = if escapes_root(&request.target) {
                warn!("Refusing to serve {} outside the document root", request.target);
                HttpResponse::not_found(&path)
            } else {
                HttpResponse::from_file(&path).await
            };

            if request.method == Method::HEAD {
                response.without_body()
            } else {
                response
            }
        }
        Method::Other(_) => HttpResponse::new(StatusCode::NotImplemented),
    }
}

/// Append the request target to the document root as text.
///
/// `Path::join` would discard the root for an absolute target such as
/// `/index.html`, so the two are concatenated instead.
pub fn resolve_target(document_root: &Path, target: &str) -> PathBuf {
    let mut joined = OsString::from(document_root.as_os_str());
    joined.push(target);
    PathBuf::from(joined)
}

fn escapes_root(target: &str) -> bool {
    target.split(['/', '\\']).any(|segment| segment == "..")
}
