//! Command line entry point for the microserve file server.
//!
//! ```text
//! microserve <port> <document-root> <max-workers>
//! microserve --config <file.json>
//! ```

use std::process::ExitCode;

use log::{error, info};
use microserve::{HttpServer, ServerConfig, ServerError};

const USAGE: &str = "usage: microserve <port> <document-root> <max-workers>\n       microserve --config <file.json>";

fn load_config(args: &[String]) -> Result<ServerConfig, ServerError> {
    let config = match args {
        [flag, path] if flag == "--config" => ServerConfig::from_json_file(path)?,
        [port, root, max_workers] => {
            let port = port
                .parse()
                .map_err(|e| ServerError::InvalidConfig(format!("port {port:?}: {e}")))?;
            let max_workers = max_workers
                .parse()
                .map_err(|e| ServerError::InvalidConfig(format!("max-workers {max_workers:?}: {e}")))?;
            ServerConfig::new(port, root, max_workers)
        }
        _ => return Err(ServerError::InvalidConfig(USAGE.to_string())),
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match HttpServer::new(config).start().await {
        Ok(summary) => {
            info!(
                "Handled {completed} connections, aborted {aborted}",
                completed = summary.completed,
                aborted = summary.aborted
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
