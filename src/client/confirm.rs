//! The two-click delete.

use crate::transaction::TransactionId;

/// Whether a delete is waiting for the user to confirm it.
///
/// The first click on a transaction's delete button asks for confirmation and
/// a second click on the same transaction confirms it. Only one transaction
/// can be awaiting confirmation at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteConfirmation {
    /// No delete is pending.
    #[default]
    Idle,
    /// The delete button for this transaction was clicked once.
    AwaitingConfirmation(TransactionId),
}

impl DeleteConfirmation {
    /// Handle a click on the delete button for `id`.
    ///
    /// Returns `Some(id)` when the click confirms a pending delete, in which
    /// case the state returns to [DeleteConfirmation::Idle]. A click on a
    /// different transaction replaces the pending one.
    pub fn click(&mut self, id: TransactionId) -> Option<TransactionId> {
        match *self {
            DeleteConfirmation::AwaitingConfirmation(pending) if pending == id => {
                *self = DeleteConfirmation::Idle;
                Some(id)
            }
            _ => {
                *self = DeleteConfirmation::AwaitingConfirmation(id);
                None
            }
        }
    }

    /// Drop any pending delete.
    pub fn cancel(&mut self) {
        *self = DeleteConfirmation::Idle;
    }

    /// The transaction waiting for confirmation, if any.
    pub fn pending(&self) -> Option<TransactionId> {
        match self {
            DeleteConfirmation::Idle => None,
            DeleteConfirmation::AwaitingConfirmation(id) => Some(*id),
        }
    }
}
