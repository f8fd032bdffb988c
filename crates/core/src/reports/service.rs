//! Report generation service.

use std::collections::BTreeMap;

use crate::calendar::LocalDateKey;
use crate::ledger::Transaction;

use super::error::ReportError;
use super::types::{DailyRollup, MonthlyReport};

/// Builds daily rollups and monthly summaries from a transaction set.
///
/// Pure computation over a fully materialized list with no I/O. Totals use
/// checked arithmetic, so oversized amounts surface as errors.
pub struct ReportService;

impl ReportService {
    /// Aggregates transactions into per-day rollups and a month summary.
    ///
    /// Each date appears exactly once, in ascending date order. Input order
    /// does not affect any total. An empty input yields no rollups and a
    /// zero summary.
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` overflow variant if a total does not fit.
    pub fn aggregate(transactions: &[Transaction]) -> Result<MonthlyReport, ReportError> {
        let mut by_day: BTreeMap<LocalDateKey, DailyRollup> = BTreeMap::new();
        for transaction in transactions {
            by_day
                .entry(transaction.date)
                .or_insert_with(|| DailyRollup::empty(transaction.date))
                .record(transaction)?;
        }

        let daily = by_day.into_values().map(DailyRollup::rounded).collect();
        MonthlyReport::from_rollups(daily)
    }

    /// Returns one day's entries in creation order.
    #[must_use]
    pub fn entries_on(transactions: &[Transaction], day: LocalDateKey) -> Vec<Transaction> {
        let mut entries: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.date == day)
            .cloned()
            .collect();
        entries.sort_by_key(|t| t.created_at);
        entries
    }
}
