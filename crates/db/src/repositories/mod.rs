//! Repository implementations for database operations.

pub mod transaction;

pub use transaction::TransactionRepository;
