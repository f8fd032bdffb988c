//! Persistence contract for transactions.

use async_trait::async_trait;

use daybook_shared::types::{TransactionId, UserId};

use super::error::LedgerError;
use super::transaction::{NewTransaction, Transaction};
use crate::calendar::{LocalDateKey, MonthRef};

/// Owner-scoped transaction storage.
///
/// Every operation is filtered by owner; no implementation may return or
/// remove another owner's rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Lists the owner's transactions with `start <= date <= end`, ordered by
    /// date then creation time.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreUnavailable` if the backend fails.
    async fn list_by_owner_and_range(
        &self,
        owner: UserId,
        start: LocalDateKey,
        end: LocalDateKey,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Validates and stores a new entry, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or
    /// `LedgerError::StoreUnavailable` if the backend fails.
    async fn insert(&self, owner: UserId, input: NewTransaction)
    -> Result<Transaction, LedgerError>;

    /// Deletes the entry matching both `id` and `owner`.
    ///
    /// Deleting a missing id, or an id owned by someone else, is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreUnavailable` if the backend fails.
    async fn delete_by_id(&self, owner: UserId, id: TransactionId) -> Result<(), LedgerError>;
}

/// Lists every transaction the owner recorded in `month`.
///
/// # Errors
///
/// Propagates store failures.
pub async fn fetch_month(
    store: &dyn TransactionStore,
    owner: UserId,
    month: MonthRef,
) -> Result<Vec<Transaction>, LedgerError> {
    let (start, end) = month.range();
    store.list_by_owner_and_range(owner, start, end).await
}
