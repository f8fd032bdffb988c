//! Ledger error types for validation and store errors.

use daybook_shared::AppError;
use thiserror::Error;

use crate::calendar::CalendarError;
use crate::currency::CurrencyError;
use crate::reports::ReportError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A required field was absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Amount is zero or negative after rounding to cents.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// Amount exceeds the storable range.
    #[error("Amount {0} exceeds the maximum of 999999999999.99")]
    AmountTooLarge(String),

    /// Amount text is not a decimal number.
    #[error("Invalid amount format: {0}")]
    InvalidAmountFormat(String),

    /// Kind is neither `income` nor `expense`.
    #[error("Type must be income or expense, got '{0}'")]
    InvalidKind(String),

    /// Bad date, month or year.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// An amount entered in a display currency could not be converted.
    #[error(transparent)]
    Conversion(#[from] CurrencyError),

    // ========== Report Errors ==========
    /// Stored amounts could not be totalled or converted.
    #[error(transparent)]
    Report(#[from] ReportError),

    // ========== Store Errors ==========
    /// The persistence backend failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// Returns true for errors caused by the caller's input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::StoreUnavailable(_)
                | Self::Report(_)
                | Self::Conversion(CurrencyError::RateUnavailable(_))
        )
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::StoreUnavailable(msg) => Self::StoreUnavailable(msg),
            LedgerError::Conversion(err) | LedgerError::Report(ReportError::Conversion(err)) => {
                err.into()
            }
            LedgerError::Report(err) => Self::InvalidAmount(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        Self::Validation(err.to_string())
    }
}
