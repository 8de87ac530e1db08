//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{
        TransactionFields, TransactionId,
        db::{get_transaction, update_transaction},
    },
};

const INTERNAL_ERROR_MESSAGE: &str = "Failed to update transaction";

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating a transaction.
///
/// The body may contain any subset of the transaction fields. The owner of the
/// transaction is not checked; any client that knows the ID may update it.
/// Responds with the updated transaction.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(transaction_id): Path<String>,
    body: Result<Json<TransactionFields>, JsonRejection>,
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

    // An unknown ID is reported before a malformed body.
    let patch = match body {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            return match get_transaction(transaction_id, &connection) {
                Ok(_) => Error::InvalidRequestBody(rejection.body_text()).into_response(),
                Err(error) => error.into_response_with(INTERNAL_ERROR_MESSAGE),
            };
        }
    };

    match update_transaction(transaction_id, patch, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => {
            tracing::debug!("Could not update transaction {transaction_id}: {error}");
            error.into_response_with(INTERNAL_ERROR_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::test_server,
        transaction::{Transaction, TransactionId, TransactionType},
    };

    async fn create_rent(server: &TestServer) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "userId": "u1",
                "name": "Rent",
                "amount": 1200,
                "type": "expense",
            }))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn updates_transaction() {
        let server = test_server();
        let created = create_rent(&server).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, created.id))
            .json(&json!({ "amount": 1300, "type": "income" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(
            updated,
            Transaction {
                amount: 1300.0,
                kind: TransactionType::Income,
                ..created
            }
        );
    }

    #[tokio::test]
    async fn ignores_id_and_created_at_in_body() {
        let server = test_server();
        let created = create_rent(&server).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, created.id))
            .json(&json!({
                "id": TransactionId::new(),
                "createdAt": "2000-01-01T00:00:00Z",
                "name": "Mortgage",
            }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Mortgage");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let server = test_server();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, TransactionId::new()))
            .json(&json!({ "name": "Groceries" }))
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Transaction not found" }));
    }

    #[tokio::test]
    async fn unknown_id_with_malformed_body_is_not_found() {
        let server = test_server();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, TransactionId::new()))
            .text("not json")
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Transaction not found" }));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let server = test_server();
        let created = create_rent(&server).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, created.id))
            .json(&json!({ "amount": "a lot" }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<serde_json::Value>();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_id_is_not_found() {
        let server = test_server();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, "12345"))
            .json(&json!({ "name": "Groceries" }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected_and_not_written() {
        let server = test_server();
        let created = create_rent(&server).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, created.id))
            .json(&json!({ "name": "ab" }))
            .await;

        response.assert_status_bad_request();
        let listed = server
            .get(&format_endpoint(endpoints::TRANSACTION, "u1"))
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(listed, vec![created]);
    }
}
