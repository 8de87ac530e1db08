//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The [Transaction] model and the [TransactionFields] it is validated from
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction REST API

mod create_endpoint;
mod db;
mod delete_endpoint;
mod list_endpoint;
mod model;
mod update_endpoint;
mod validation;

pub use create_endpoint::create_transaction_endpoint;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions_by_user, update_transaction,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use model::{
    InvalidTransactionType, Transaction, TransactionId, TransactionType, map_transaction_row,
};
pub use update_endpoint::update_transaction_endpoint;
pub use validation::{
    MIN_NAME_LENGTH, NewTransaction, TransactionFields, ValidationError, ValidationErrors,
};
