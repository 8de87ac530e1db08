//! Command line and environment configuration for the server.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

use crate::DEFAULT_RATES_URL;

/// The REST API server for the ledger finance tracker.
///
/// Every option can also be set with the environment variable named in its
/// help text, e.g. from a `.env` file.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DATABASE_PATH", default_value = "ledger.db")]
    pub db_path: PathBuf,

    /// The IP address to listen on.
    #[arg(long, env = "LEDGER_ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub address: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The exchange rates service that `GET /rates` passes through.
    #[arg(long, env = "RATES_URL", default_value = DEFAULT_RATES_URL)]
    pub rates_url: String,

    /// Also write debug logs to this file.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// What happened when loading a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    /// The file was found and its variables were set.
    Loaded,
    /// There was no `.env` file.
    Missing,
    /// The file exists but could not be read or parsed.
    Invalid(String),
}

impl DotenvStatus {
    /// Classify the result of one of the `dotenvy` loaders.
    pub fn from_result<T>(result: Result<T, dotenvy::Error>) -> Self {
        match result {
            Ok(_) => DotenvStatus::Loaded,
            Err(error) if error.not_found() => DotenvStatus::Missing,
            Err(error) => DotenvStatus::Invalid(error.to_string()),
        }
    }

    /// Log the status. Only an invalid file is logged as a warning.
    pub fn log(&self) {
        match self {
            DotenvStatus::Loaded => tracing::debug!("Loaded environment from .env file"),
            DotenvStatus::Missing => tracing::debug!("No .env file found"),
            DotenvStatus::Invalid(error) => tracing::warn!("Could not load .env file: {error}"),
        }
    }
}

impl Config {
    /// The socket address the server binds to.
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}
