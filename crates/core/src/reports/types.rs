//! Report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use daybook_shared::types::round_money;

use super::error::ReportError;
use crate::calendar::LocalDateKey;
use crate::currency::DisplayContext;
use crate::ledger::{Transaction, TransactionKind};

/// Income, expense and net totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRollup {
    /// Day key.
    pub date: LocalDateKey,
    /// Sum of income amounts.
    pub income_total: Decimal,
    /// Sum of expense amounts.
    pub expense_total: Decimal,
    /// `income_total - expense_total`.
    pub net_total: Decimal,
    /// Number of entries on the day.
    pub transaction_count: u32,
}

impl DailyRollup {
    /// A day with no entries.
    #[must_use]
    pub const fn empty(date: LocalDateKey) -> Self {
        Self {
            date,
            income_total: Decimal::ZERO,
            expense_total: Decimal::ZERO,
            net_total: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    pub(crate) fn record(&mut self, transaction: &Transaction) -> Result<(), ReportError> {
        let date = self.date;
        let side = match transaction.kind {
            TransactionKind::Income => &mut self.income_total,
            TransactionKind::Expense => &mut self.expense_total,
        };
        *side = side
            .checked_add(transaction.amount)
            .ok_or(ReportError::DailyOverflow(date))?;
        self.transaction_count += 1;
        Ok(())
    }

    /// Rounds both sides to cents and derives the net from the rounded values.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::from_sides(
            self.date,
            round_money(self.income_total),
            round_money(self.expense_total),
            self.transaction_count,
        )
    }

    /// Converts to display units.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Conversion` if a converted total overflows.
    pub fn in_display(&self, ctx: &DisplayContext) -> Result<Self, ReportError> {
        Ok(Self::from_sides(
            self.date,
            ctx.to_display_rounded(self.income_total)?,
            ctx.to_display_rounded(self.expense_total)?,
            self.transaction_count,
        ))
    }

    fn from_sides(date: LocalDateKey, income: Decimal, expense: Decimal, count: u32) -> Self {
        Self {
            date,
            income_total: income,
            expense_total: expense,
            net_total: income - expense,
            transaction_count: count,
        }
    }
}

/// Totals for a month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Sum of daily income totals.
    pub total_income: Decimal,
    /// Sum of daily expense totals.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub profit: Decimal,
    /// Sum of daily counts.
    pub transaction_count: u32,
}

impl MonthlySummary {
    /// Sums already-rounded rollups.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::MonthlyOverflow` if a total does not fit.
    pub fn from_rollups(rollups: &[DailyRollup]) -> Result<Self, ReportError> {
        let total_income = checked_total(rollups.iter().map(|r| r.income_total))?;
        let total_expense = checked_total(rollups.iter().map(|r| r.expense_total))?;
        Ok(Self {
            total_income,
            total_expense,
            profit: total_income - total_expense,
            transaction_count: rollups.iter().map(|r| r.transaction_count).sum(),
        })
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal, ReportError> {
    amounts
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .map(round_money)
        .ok_or(ReportError::MonthlyOverflow)
}

/// Daily rollups plus the month summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// One rollup per day that has entries, in date order.
    pub daily: Vec<DailyRollup>,
    /// Month totals.
    pub summary: MonthlySummary,
}

impl MonthlyReport {
    /// Builds a report whose summary is derived from `daily`.
    ///
    /// # Errors
    ///
    /// See [`MonthlySummary::from_rollups`].
    pub fn from_rollups(daily: Vec<DailyRollup>) -> Result<Self, ReportError> {
        let summary = MonthlySummary::from_rollups(&daily)?;
        Ok(Self { daily, summary })
    }

    /// Converts every rollup and re-derives the summary in display units.
    ///
    /// # Errors
    ///
    /// Returns an error if a converted total overflows.
    pub fn in_display(&self, ctx: &DisplayContext) -> Result<Self, ReportError> {
        if !ctx.is_converting() {
            return Ok(self.clone());
        }
        let daily = self
            .daily
            .iter()
            .map(|r| r.in_display(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rollups(daily)
    }

    /// Returns true if the month has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Looks up one day's rollup.
    #[must_use]
    pub fn rollup_for(&self, date: LocalDateKey) -> Option<&DailyRollup> {
        self.daily.iter().find(|r| r.date == date)
    }
}
