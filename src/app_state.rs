//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, rates::RatesState};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The client and URL for fetching exchange rates.
    pub rates: RatesState,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `rates_url` is the upstream service that `GET /rates` passes through.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the HTTP
    /// client for the rates service cannot be built.
    pub fn new(db_connection: Connection, rates_url: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            db_connection: connection,
            rates: RatesState::new(rates_url)?,
        })
    }
}
