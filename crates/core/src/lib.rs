//! Core business logic for Daybook.
//!
//! This crate contains the monthly aggregation and currency-normalization
//! engine with no web framework or database dependencies. Persistence and
//! the rate source are reached only through the `TransactionStore` and
//! `RateSource` traits.
//!
//! # Modules
//!
//! - `calendar` - Local-date keys, month ranges and the month grid
//! - `ledger` - Transactions, validation, the store contract and the ledger service
//! - `reports` - Daily rollups, monthly summaries and the report cache
//! - `currency` - Display conversion, rate sources and the rate cache
//! - `export` - CSV rendering

pub mod calendar;
pub mod currency;
pub mod export;
pub mod ledger;
pub mod reports;
