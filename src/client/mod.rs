//! A client for the transaction API that keeps a local copy of each user's
//! transactions in sync with the server.
//!
//! - [ApiClient] makes the HTTP calls.
//! - [TransactionCache] holds the last known transactions per user and is
//!   only ever changed through [TransactionCache::reduce].
//! - [DeleteConfirmation] tracks the two-click delete.
//! - [TransactionSession] ties these together for one active user.

mod api;
mod cache;
mod confirm;
mod session;

pub use api::{ApiClient, ClientError};
pub use cache::{CacheAction, TransactionCache};
pub use confirm::DeleteConfirmation;
pub use session::TransactionSession;
