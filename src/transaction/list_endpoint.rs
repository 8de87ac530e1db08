//! Defines the endpoint for listing a user's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, transaction::db::get_transactions_by_user};

const INTERNAL_ERROR_MESSAGE: &str = "Server error while fetching transactions";

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with all of a user's transactions, newest first.
///
/// A user without transactions gets an empty list.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path(user_id): Path<String>,
) -> Response {
    tracing::debug!("Fetching transactions for user {user_id}");

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response_with(INTERNAL_ERROR_MESSAGE);
        }
    };

    match get_transactions_by_user(&user_id, &connection) {
        Ok(transactions) => {
            tracing::debug!("Found {} transactions", transactions.len());
            Json(transactions).into_response()
        }
        Err(error) => error.into_response_with(INTERNAL_ERROR_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::test_server,
        transaction::Transaction,
    };

    #[tokio::test]
    async fn lists_created_transaction() {
        let server = test_server();
        let created = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "userId": "u1",
                "name": "Rent",
                "amount": 1200,
                "type": "expense",
            }))
            .await
            .json::<Transaction>();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, "u1"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![created]);
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_list() {
        let server = test_server();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, "nobody"))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let server = test_server();
        let mut created = Vec::new();
        for name in ["First", "Second", "Third"] {
            let transaction = server
                .post(endpoints::TRANSACTIONS)
                .json(&json!({
                    "userId": "u1",
                    "name": name,
                    "amount": 1,
                    "type": "income",
                }))
                .await
                .json::<Transaction>();
            created.push(transaction);
        }

        let listed = server
            .get(&format_endpoint(endpoints::TRANSACTION, "u1"))
            .await
            .json::<Vec<Transaction>>();

        created.reverse();
        assert_eq!(listed, created);
    }
}
