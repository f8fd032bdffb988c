//! Monthly aggregation.
//!
//! Turns a month of transactions into:
//! - Daily income/expense/net rollups
//! - A monthly summary derived from those rollups
//! - Display-currency variants, cached per owner and month

pub mod cache;
pub mod error;
pub mod service;
pub mod types;


pub use cache::{Generation, ReportCache, ReportKey};
pub use error::ReportError;
pub use service::ReportService;
pub use types::{DailyRollup, MonthlyReport, MonthlySummary};
