//! Currency error types.

use daybook_shared::AppError;
use thiserror::Error;

/// Errors from rate lookup and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The rate source could not be reached or returned no usable rate.
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// A conversion to the base currency produced zero or less.
    #[error("Converted amount must be greater than 0, got {0}")]
    InvalidAmount(String),

    /// A converted amount does not fit in a `Decimal`.
    #[error("Amount {0} is too large to convert")]
    Overflow(String),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::RateUnavailable(msg) => Self::RateUnavailable(msg),
            CurrencyError::InvalidAmount(_) | CurrencyError::Overflow(_) => {
                Self::InvalidAmount(err.to_string())
            }
        }
    }
}
