//! Income and expense entries.
//!
//! This module implements:
//! - The transaction model and input validation
//! - The owner-scoped store contract and an in-memory store
//! - The ledger service that ties store, rates and reports together

pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod transaction;

pub use error::LedgerError;
pub use memory::InMemoryTransactionStore;
pub use service::{CalendarView, ExportDocument, LedgerService, MonthView};
pub use store::{TransactionStore, fetch_month};
pub use transaction::{NewTransaction, Transaction, TransactionKind, sort_chronologically};
