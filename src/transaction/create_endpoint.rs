//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{TransactionFields, db::create_transaction},
};

const INTERNAL_ERROR_MESSAGE: &str = "Failed to create transaction";

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored transaction, including its assigned ID
/// and creation time.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    body: Result<Json<TransactionFields>, JsonRejection>,
) -> Response {
    let fields = match body {
        Ok(Json(fields)) => fields,
        Err(rejection) => {
            return Error::InvalidRequestBody(rejection.body_text()).into_response();
        }
    };

    if fields
        .user_id
        .as_deref()
        .is_none_or(|user_id| user_id.trim().is_empty())
    {
        return Error::MissingUserId.into_response();
    }

    let new_transaction = match fields.validate() {
        Ok(new_transaction) => new_transaction,
        Err(errors) => {
            tracing::debug!("Rejected new transaction: {errors}");
            return Error::from(errors).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response_with(INTERNAL_ERROR_MESSAGE);
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response_with(INTERNAL_ERROR_MESSAGE),
    }
}
