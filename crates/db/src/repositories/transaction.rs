//! Transaction repository backing the ledger's store contract.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use daybook_core::calendar::LocalDateKey;
use daybook_core::ledger::{LedgerError, NewTransaction, Transaction, TransactionStore};
use daybook_shared::types::{TransactionId, UserId};

use crate::entities::transactions;

/// `PostgreSQL` implementation of [`TransactionStore`].
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn store_error(err: DbErr) -> LedgerError {
    tracing::error!(error = %err, "Transaction store query failed");
    LedgerError::StoreUnavailable(err.to_string())
}

fn to_domain(model: transactions::Model) -> Result<Transaction, LedgerError> {
    let kind = model.kind.parse().map_err(|_| {
        LedgerError::StoreUnavailable(format!(
            "row {} has unknown type '{}'",
            model.id, model.kind
        ))
    })?;

    Ok(Transaction {
        id: TransactionId::from_uuid(model.id),
        owner: UserId::from_uuid(model.user_id),
        date: LocalDateKey::from_date(model.date),
        kind,
        amount: model.amount,
        note: model.note,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn list_by_owner_and_range(
        &self,
        owner: UserId,
        start: LocalDateKey,
        end: LocalDateKey,
    ) -> Result<Vec<Transaction>, LedgerError> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .filter(transactions::Column::Date.between(start.date(), end.date()))
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn insert(
        &self,
        owner: UserId,
        input: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let input = input.validate()?;

        let row = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            user_id: Set(owner.into_inner()),
            date: Set(input.date.date()),
            kind: Set(input.kind.as_str().to_string()),
            amount: Set(input.amount),
            note: Set(input.note),
            created_at: Set(Utc::now().into()),
        };

        let saved = row.insert(&self.db).await.map_err(store_error)?;
        to_domain(saved)
    }

    async fn delete_by_id(&self, owner: UserId, id: TransactionId) -> Result<(), LedgerError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        tracing::debug!(transaction_id = %id, rows = result.rows_affected, "Delete executed");
        Ok(())
    }
}
