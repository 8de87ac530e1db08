//! Keeps the active user's cached transactions in sync with the server.

use crate::{
    Summary,
    client::{ApiClient, CacheAction, ClientError, DeleteConfirmation, TransactionCache},
    transaction::{Transaction, TransactionFields, TransactionId},
};

/// One user's view of their transactions.
///
/// Reads come from the cache. Each mutation makes one API call and applies
/// the server's response to the cache. A failed call leaves the cache as it
/// was and is kept in [TransactionSession::last_error] until the next call
/// succeeds.
#[derive(Debug)]
pub struct TransactionSession {
    api: ApiClient,
    cache: TransactionCache,
    user_id: String,
    confirmation: DeleteConfirmation,
    last_error: Option<String>,
}

impl TransactionSession {
    /// Create a session for `user_id` with an empty cache.
    pub fn new(api: ApiClient, user_id: &str) -> Self {
        Self {
            api,
            cache: TransactionCache::new(),
            user_id: user_id.to_owned(),
            confirmation: DeleteConfirmation::Idle,
            last_error: None,
        }
    }

    /// The active user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Make `user_id` the active user, dropping any pending delete.
    ///
    /// Cached lists for other users are kept.
    pub fn switch_user(&mut self, user_id: &str) {
        self.user_id = user_id.to_owned();
        self.confirmation.cancel();
    }

    /// Fetch the active user's transactions unless they are already cached.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        if self.cache.is_loaded(&self.user_id) {
            return Ok(());
        }

        self.refresh().await
    }

    /// Fetch the active user's transactions, replacing any cached list.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let result = self.api.list_transactions(&self.user_id).await;

        self.record(result).map(|transactions| {
            self.apply(CacheAction::Loaded {
                user_id: self.user_id.clone(),
                transactions,
            })
        })
    }

    /// Create a transaction.
    ///
    /// `fields` without a user ID are created for the active user.
    pub async fn create(&mut self, mut fields: TransactionFields) -> Result<Transaction, ClientError> {
        if fields.user_id.is_none() {
            fields.user_id = Some(self.user_id.clone());
        }

        let result = self.api.create_transaction(&fields).await;

        self.record(result).inspect(|transaction| {
            self.apply(CacheAction::Created(transaction.clone()));
        })
    }

    /// Update the fields present in `patch`.
    pub async fn update(
        &mut self,
        id: TransactionId,
        patch: TransactionFields,
    ) -> Result<Transaction, ClientError> {
        let result = self.api.update_transaction(id, &patch).await;

        self.record(result).inspect(|transaction| {
            self.apply(CacheAction::Updated(transaction.clone()));
        })
    }

    /// Handle a click on the delete button for `id`.
    ///
    /// The first click only asks for confirmation and returns `Ok(false)`.
    /// A second click on the same transaction deletes it and returns
    /// `Ok(true)`.
    pub async fn click_delete(&mut self, id: TransactionId) -> Result<bool, ClientError> {
        let Some(id) = self.confirmation.click(id) else {
            return Ok(false);
        };

        let result = self.api.delete_transaction(id).await;

        self.record(result).map(|()| {
            self.apply(CacheAction::Deleted(id));
            true
        })
    }

    /// Drop any pending delete.
    pub fn cancel_delete(&mut self) {
        self.confirmation.cancel();
    }

    /// The transaction waiting for delete confirmation, if any.
    pub fn pending_delete(&self) -> Option<TransactionId> {
        self.confirmation.pending()
    }

    /// The active user's cached transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        self.cache.transactions(&self.user_id).unwrap_or_default()
    }

    /// The totals of the active user's cached transactions.
    pub fn summary(&self) -> Summary {
        self.cache.summary(&self.user_id)
    }

    /// The cache for all users loaded in this session.
    pub fn cache(&self) -> &TransactionCache {
        &self.cache
    }

    /// The message of the last failed call, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn apply(&mut self, action: CacheAction) {
        self.cache = std::mem::take(&mut self.cache).reduce(action);
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(error) => {
                tracing::warn!("Transaction request for user {} failed: {error}", self.user_id);
                self.last_error = Some(error.to_string());
            }
        }

        result
    }
}
