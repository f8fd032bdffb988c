//! Query-string extractors.

use serde::Deserialize;

use daybook_core::calendar::{LocalDateKey, MonthRef};
use daybook_shared::types::Currency;

use crate::error::ApiError;

/// `?month=10&year=2025&currency=PHP&date=2025-10-02`
///
/// Fields are kept as text so malformed values produce JSON validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// Month, 1-12.
    pub month: Option<String>,
    /// Four-digit year.
    pub year: Option<String>,
    /// Requested display currency; unknown codes fall back to the base currency.
    pub currency: Option<String>,
    /// Single day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl MonthQuery {
    /// Parses `month` and `year`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either is missing or out of range.
    pub fn month_ref(&self) -> Result<MonthRef, ApiError> {
        let (Some(month), Some(year)) = (self.month.as_deref(), self.year.as_deref()) else {
            return Err(ApiError::validation("month and year are required"));
        };

        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| ApiError::validation(format!("Invalid month: {month}")))?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| ApiError::validation(format!("Invalid year: {year}")))?;

        Ok(MonthRef::new(year, month)?)
    }

    /// Parses the optional `date`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if present but malformed.
    pub fn day(&self) -> Result<Option<LocalDateKey>, ApiError> {
        self.date
            .as_deref()
            .map(|d| d.parse::<LocalDateKey>().map_err(ApiError::from))
            .transpose()
    }

    /// Requested display currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        Currency::from_query(self.currency.as_deref())
    }
}
