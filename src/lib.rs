//! Ledger is a personal finance tracker.
//!
//! Users record income and expense transactions and view aggregate balances
//! alongside live currency exchange rates. This library provides:
//! - a JSON REST API over a SQLite-backed transaction store,
//! - the summary aggregator that derives income, expense and balance totals,
//! - a client library that mirrors a user's transactions in a local cache and
//!   keeps it in sync with the server after each mutation.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
pub mod client;
mod config;
mod db;
pub mod endpoints;
mod logging;
mod rates;
mod routing;
mod summary;
#[cfg(test)]
mod test_utils;
pub mod transaction;

pub use app_state::AppState;
pub use config::{Config, DotenvStatus};
pub use db::initialize as initialize_db;
pub use logging::setup_logging;
pub use rates::{DEFAULT_RATES_URL, ExchangeRates, RatesState};
pub use routing::build_router;
pub use summary::{Summary, summarize};

use crate::transaction::ValidationErrors;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction was created without a user ID.
    #[error("userId is required")]
    MissingUserId,

    /// Client-supplied transaction fields violate the transaction schema.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The request body could not be parsed, e.g. a field had the wrong type.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Transaction not found")]
    NotFound,

    /// The upstream exchange rates service could not be reached or returned
    /// something other than a rates payload.
    ///
    /// The error string should only be logged on the server.
    #[error("the exchange rates service failed: {0}")]
    Upstream(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingUserId | Error::Validation(_) | Error::InvalidRequestBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Upstream(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Render the error as a JSON response.
    ///
    /// Errors the client can act on are reported with their own message.
    /// Internal errors are logged and replaced with `internal_message` so that
    /// no server details reach the client.
    pub fn into_response_with(self, internal_message: &str) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            internal_message.to_owned()
        } else {
            self.to_string()
        };

        error_response(status, &message)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_response_with("Internal server error")
    }
}

/// A JSON response of the form `{"error": message}`.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
