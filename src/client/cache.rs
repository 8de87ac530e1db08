//! The client's copy of each user's transactions.

use std::collections::HashMap;

use crate::{
    Summary, summarize,
    transaction::{Transaction, TransactionId},
};

/// A change to apply to the cache, carrying the server's response.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheAction {
    /// The full list of a user's transactions was fetched.
    Loaded {
        /// The user the transactions belong to.
        user_id: String,
        /// The transactions, newest first.
        transactions: Vec<Transaction>,
    },
    /// A transaction was created.
    Created(Transaction),
    /// A transaction was updated.
    Updated(Transaction),
    /// A transaction was deleted.
    Deleted(TransactionId),
}

/// The last known transactions for each user, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionCache {
    by_user: HashMap<String, Vec<Transaction>>,
}

impl TransactionCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action` and return the resulting cache.
    ///
    /// Created transactions are only added when their user's list has been
    /// loaded, otherwise the next load would be missing older transactions.
    /// An update that changes the owner moves the transaction out of the old
    /// owner's list and, if it is loaded, to the front of the new owner's list.
    /// An update or delete of a transaction that is not cached does nothing.
    pub fn reduce(mut self, action: CacheAction) -> Self {
        match action {
            CacheAction::Loaded {
                user_id,
                transactions,
            } => {
                self.by_user.insert(user_id, transactions);
            }
            CacheAction::Created(transaction) => {
                if let Some(transactions) = self.by_user.get_mut(&transaction.user_id) {
                    transactions.insert(0, transaction);
                }
            }
            CacheAction::Updated(updated) => {
                let mut moved = false;

                for (user_id, transactions) in self.by_user.iter_mut() {
                    let Some(index) = transactions
                        .iter()
                        .position(|transaction| transaction.id == updated.id)
                    else {
                        continue;
                    };

                    if *user_id == updated.user_id {
                        transactions[index] = updated.clone();
                    } else {
                        transactions.remove(index);
                        moved = true;
                    }
                }

                // The update changed the owner, so the record joins the new owner's list.
                let new_owner = self.by_user.get_mut(&updated.user_id).filter(|transactions| {
                    moved && transactions.iter().all(|transaction| transaction.id != updated.id)
                });
                if let Some(transactions) = new_owner {
                    transactions.insert(0, updated);
                }
            }
            CacheAction::Deleted(id) => {
                for transactions in self.by_user.values_mut() {
                    transactions.retain(|transaction| transaction.id != id);
                }
            }
        }

        self
    }

    /// Whether the user's transactions have been loaded.
    pub fn is_loaded(&self, user_id: &str) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// The cached transactions for a user, or `None` if they have not been loaded.
    pub fn transactions(&self, user_id: &str) -> Option<&[Transaction]> {
        self.by_user.get(user_id).map(Vec::as_slice)
    }

    /// The totals of the cached transactions for a user.
    ///
    /// A user that has not been loaded sums to zero.
    pub fn summary(&self, user_id: &str) -> Summary {
        summarize(self.transactions(user_id).unwrap_or_default())
    }
}
