//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{Level, error, info, log, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::parser::Error as ParserError;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::handle_connection;

/// How connection tasks ended once the server stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Connection tasks that ran to completion.
    pub completed: usize,
    /// Connection tasks cancelled after the grace period ran out.
    pub aborted: usize,
}

/// An HTTP file server.
pub struct HttpServer {
    /// The server configuration.
    pub config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Bind the listening socket.
    pub async fn bind(&self) -> Result<TcpListener, Error> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::BindError { addr, source })?;

        let port = listener.local_addr().map_or(addr.port(), |local| local.port());
        info!(
            "Starting server on port: {port} with root folder \"{root}\" and {max} threads limit.",
            root = self.config.document_root.display(),
            max = self.config.max_workers
        );
        Ok(listener)
    }

    /// Start the server and serve until Ctrl+C.
    pub async fn start(&self) -> Result<ShutdownSummary, Error> {
        let listener = self.bind().await?;
        self.serve(listener, Self::ctrl_c()).await
    }

    /// Resolve once the process receives Ctrl+C.
    async fn ctrl_c() {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                error!("Error setting up Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Every accepted connection becomes a task that first waits for one of
    /// `max_workers` slots, so any number of connections may queue while at
    /// most `max_workers` are handled at once. On shutdown the listener is
    /// closed, queued and running connections get the grace period to finish,
    /// and whatever is left is aborted.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<ShutdownSummary, Error>
    where
        F: Future<Output = ()>,
    {
        let workers = Arc::new(Semaphore::new(self.config.max_workers));
        let mut tasks = JoinSet::new();
        let mut completed = 0;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check for shutdown signal
                () = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                // Reap finished connections
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::reap(joined);
                    completed += 1;
                }

                // Accept new connections
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, peer)) => {
                            self.dispatch(socket, peer, workers.clone(), &mut tasks);
                        }
                        Err(e) => Self::handle_accept_error(e).await,
                    }
                }
            }
        }

        drop(listener);

        Ok(Self::perform_shutdown(tasks, completed, self.config.shutdown_grace()).await)
    }

    /// Queue a connection for the next free worker slot.
    fn dispatch(
        &self,
        socket: TcpStream,
        peer: SocketAddr,
        workers: Arc<Semaphore>,
        tasks: &mut JoinSet<()>,
    ) {
        let config = Arc::clone(&self.config);

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the slot
            let Ok(_permit) = workers.acquire_owned().await else {
                return;
            };

            if let Err(e) = handle_connection(socket, peer, &config.document_root).await {
                let level = failure_level(&e);
                match e {
                    Error::ParseError(ParserError::Io(e)) => {
                        log!(level, "Error reading request from {peer}: {e}");
                    }
                    Error::ParseError(e) => {
                        log!(level, "Server accepts only HTTP protocol, dropping {peer}: {e}");
                    }
                    e => log!(level, "Error in client's IO for {peer}: {e}"),
                }
            }
        });
    }

    fn reap(joined: Result<(), JoinError>) {
        if let Err(e) = joined {
            error!("Connection task failed: {e}");
        }
    }

    /// Accept errors only affect the connection being accepted.
    async fn handle_accept_error(e: std::io::Error) {
        error!("Error accepting request: {e}");

        // Back off briefly so a persistent failure (e.g. out of file descriptors) does not spin
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    /// Wait up to `grace` for the remaining connections, then abort the rest.
    async fn perform_shutdown(
        mut tasks: JoinSet<()>,
        mut completed: usize,
        grace: Duration,
    ) -> ShutdownSummary {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());

        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = tasks.join_next().await {
                Self::reap(joined);
                completed += 1;
            }
        })
        .await;

        let aborted = tasks.len();
        if drained.is_err() {
            warn!("Grace period elapsed, aborting {aborted} connections");
            tasks.shutdown().await;
        }

        info!("Server shutdown complete");
        ShutdownSummary { completed, aborted }
    }
}

/// Level a failed connection is logged at: `Warn` when the request could not
/// be read or parsed, `Error` otherwise.
pub(crate) fn failure_level(e: &Error) -> Level {
    match e {
        Error::ParseError(_) => Level::Warn,
        _ => Level::Error,
    }
}
