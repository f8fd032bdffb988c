//! Application-wide error types.
//!
//! Module-level errors (`CalendarError`, `LedgerError`, `CurrencyError`) are
//! converted into [`AppError`] at the service boundary.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad amount, kind, date or query parameter. Rejected before storage.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A currency conversion produced a non-positive amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Persistence backend failure. Retryable; no partial writes.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Exchange rate could not be obtained.
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::InvalidAmount(_) | Self::RateUnavailable(_) => 422,
            Self::StoreUnavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::RateUnavailable(_) => "RATE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
