//! Income and expense entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use daybook_shared::types::{TransactionId, UserId, is_valid_amount, is_within_limit, round_money};

use super::error::LedgerError;
use crate::calendar::LocalDateKey;

/// Direction of a money movement. The stored amount is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Applies the sign implied by the kind.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

/// A stored entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owner of the entry.
    #[serde(rename = "user_id")]
    pub owner: UserId,
    /// Local calendar day, the aggregation key.
    pub date: LocalDateKey,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Positive amount in the base currency.
    pub amount: Decimal,
    /// Free-text annotation.
    pub note: Option<String>,
    /// Creation time, orders entries within a day.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign of its kind.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Sorts by date, then creation time.
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
}

/// Input for creating an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Local calendar day.
    pub date: LocalDateKey,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Amount in the base currency.
    pub amount: Decimal,
    /// Optional note.
    pub note: Option<String>,
}

impl NewTransaction {
    /// Creates an unvalidated input.
    #[must_use]
    pub const fn new(
        date: LocalDateKey,
        kind: TransactionKind,
        amount: Decimal,
        note: Option<String>,
    ) -> Self {
        Self {
            date,
            kind,
            amount,
            note,
        }
    }

    /// Parses raw wire fields and validates the result.
    pub fn parse(
        date: &str,
        kind: &str,
        amount: &str,
        note: Option<&str>,
    ) -> Result<Self, LedgerError> {
        if date.trim().is_empty() {
            return Err(LedgerError::MissingField("date"));
        }
        if kind.trim().is_empty() {
            return Err(LedgerError::MissingField("type"));
        }
        if amount.trim().is_empty() {
            return Err(LedgerError::MissingField("amount"));
        }

        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| LedgerError::InvalidAmountFormat(amount.to_string()))?;

        Self::new(
            date.parse()?,
            kind.trim().parse()?,
            amount,
            note.map(String::from),
        )
        .validate()
    }

    /// Normalizes the input: amount rounded to cents, strictly positive and
    /// at most [`MAX_AMOUNT`](daybook_shared::types::MAX_AMOUNT), blank notes dropped.
    pub fn validate(self) -> Result<Self, LedgerError> {
        let amount = round_money(self.amount);
        if !is_valid_amount(amount) {
            return Err(LedgerError::NonPositiveAmount);
        }
        if !is_within_limit(amount) {
            return Err(LedgerError::AmountTooLarge(amount.to_string()));
        }

        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            amount,
            note,
            ..self
        })
    }

    /// Builds the stored entity.
    #[must_use]
    pub fn into_transaction(
        self,
        owner: UserId,
        id: TransactionId,
        created_at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id,
            owner,
            date: self.date,
            kind: self.kind,
            amount: self.amount,
            note: self.note,
            created_at,
        }
    }
}
