//! Calendar error types.

use thiserror::Error;

/// Errors raised while building date keys and month ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// Month outside 1-12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Year is not a 4-digit year.
    #[error("Year must be a 4-digit year, got {0}")]
    InvalidYear(i32),

    /// Text is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),
}
