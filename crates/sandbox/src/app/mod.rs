use std::io;
use std::path::PathBuf;

use targeting::ConfigError;
use thiserror::Error;

pub(crate) mod bootstrap;
pub(crate) mod config_io;
pub(crate) mod runner;
pub(crate) mod scenario;
pub(crate) mod sim_host;

#[derive(Debug, Error)]
pub(crate) enum SandboxError {
    #[error("{0}")]
    Usage(String),
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("scenario {origin} at {location}: {source}")]
    Scenario {
        origin: String,
        location: String,
        #[source]
        source: serde_json::Error,
    },
}
