//! Report error types.

use thiserror::Error;

use crate::calendar::LocalDateKey;
use crate::currency::CurrencyError;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// A day's totals do not fit in a `Decimal`.
    #[error("Totals for {0} are too large to compute")]
    DailyOverflow(LocalDateKey),

    /// The month's totals do not fit in a `Decimal`.
    #[error("Monthly totals are too large to compute")]
    MonthlyOverflow,

    /// Display conversion failed.
    #[error(transparent)]
    Conversion(#[from] CurrencyError),
}
