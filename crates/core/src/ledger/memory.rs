//! In-process transaction store for tests and single-node setups.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use daybook_shared::types::{TransactionId, UserId};

use super::error::LedgerError;
use super::store::TransactionStore;
use super::transaction::{NewTransaction, Transaction, sort_chronologically};
use crate::calendar::LocalDateKey;

/// A `TransactionStore` backed by a shared vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionStore {
    rows: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with existing rows.
    #[must_use]
    pub fn with_transactions(rows: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows.into_iter().collect())),
        }
    }

    /// Total rows across all owners.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if no owner has any rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn list_by_owner_and_range(
        &self,
        owner: UserId,
        start: LocalDateKey,
        end: LocalDateKey,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut matched: Vec<Transaction> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|t| t.owner == owner && start <= t.date && t.date <= end)
            .cloned()
            .collect();
        sort_chronologically(&mut matched);
        Ok(matched)
    }

    async fn insert(
        &self,
        owner: UserId,
        input: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let transaction = input
            .validate()?
            .into_transaction(owner, TransactionId::new(), Utc::now());
        self.rows.write().await.push(transaction.clone());
        Ok(transaction)
    }

    async fn delete_by_id(&self, owner: UserId, id: TransactionId) -> Result<(), LedgerError> {
        self.rows
            .write()
            .await
            .retain(|t| !(t.id == id && t.owner == owner));
        Ok(())
    }
}
