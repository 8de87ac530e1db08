//! Derives income, expense and balance totals from a list of transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionType, get_transactions_by_user},
};

/// The totals for a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income amounts.
    pub income_total: f64,
    /// The sum of all expense amounts.
    pub expense_total: f64,
    /// `income_total - expense_total`.
    pub balance: f64,
}

/// Sum the income and expenses in `transactions`.
///
/// The result does not depend on the order of `transactions`, and an empty
/// list sums to zero.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let (income_total, expense_total) =
        transactions
            .into_iter()
            .fold((0.0, 0.0), |(income, expense), transaction| {
                match transaction.kind {
                    TransactionType::Income => (income + transaction.amount, expense),
                    TransactionType::Expense => (income, expense + transaction.amount),
                }
            });

    Summary {
        income_total,
        expense_total,
        balance: income_total - expense_total,
    }
}

/// The state needed to summarize a user's transactions.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the [Summary] of a user's transactions.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Path(user_id): Path<String>,
) -> Response {
    const INTERNAL_ERROR_MESSAGE: &str = "Server error while fetching transactions";

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response_with(INTERNAL_ERROR_MESSAGE);
        }
    };

    match get_transactions_by_user(&user_id, &connection) {
        Ok(transactions) => Json(summarize(&transactions)).into_response(),
        Err(error) => error.into_response_with(INTERNAL_ERROR_MESSAGE),
    }
}
