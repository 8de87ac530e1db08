//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    transaction::{TransactionId, db::delete_transaction},
};

const INTERNAL_ERROR_MESSAGE: &str = "Failed to delete transaction";

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let Ok(transaction_id) = transaction_id.parse::<TransactionId>() else {
        return Error::NotFound.into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response_with(INTERNAL_ERROR_MESSAGE);
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => Json(json!({ "message": "Deleted successfully" })).into_response(),
        Err(error) => error.into_response_with(INTERNAL_ERROR_MESSAGE),
    }
}
