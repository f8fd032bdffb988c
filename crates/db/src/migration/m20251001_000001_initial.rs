//! Initial database migration.
//!
//! Creates the transactions table and its lookup index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS transactions CASCADE;")
            .await?;
        Ok(())
    }
}

const TRANSACTIONS_SQL: &str = r"
-- One row per income or expense entry. Amounts are in the base currency.
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    date DATE NOT NULL,
    type VARCHAR(16) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transactions_type CHECK (type IN ('income', 'expense')),
    CONSTRAINT chk_transactions_amount_positive CHECK (amount > 0)
);

-- Month listing: owner + date range, ordered by date then creation time
CREATE INDEX idx_transactions_user_date ON transactions(user_id, date, created_at);
";
