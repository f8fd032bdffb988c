//! Request-scoped display conversion.
//!
//! A [`DisplayContext`] is resolved once per request and passed explicitly to
//! aggregation and export. It converts base amounts for display and converts
//! user-entered display amounts back to the base currency for storage.
//!
//! `to_display` returns the exact product; rounding happens only at the edges
//! (`format`, `to_base`, report conversion) so that
//! `to_base(to_display(x)) == round_money(x)`.

use rust_decimal::Decimal;

use daybook_shared::types::{Currency, Money, is_valid_amount, is_within_limit, round_money};

use super::error::CurrencyError;
use super::exchange::ExchangeRate;

/// Advisory shown when amounts fall back to the base currency.
pub const RATE_UNAVAILABLE_ADVISORY: &str =
    "Unable to load exchange rate. Amounts will remain in USD.";

/// Effective display currency and rate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayContext {
    base: Currency,
    display: Currency,
    rate: Option<Decimal>,
    advisory: Option<String>,
}

impl DisplayContext {
    /// Displays amounts unchanged in the base currency.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            base: Currency::BASE,
            display: Currency::BASE,
            rate: None,
            advisory: None,
        }
    }

    /// Base-currency display after a failed rate lookup.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            advisory: Some(RATE_UNAVAILABLE_ADVISORY.to_string()),
            ..Self::identity()
        }
    }

    /// Displays amounts in `rate.target`.
    #[must_use]
    pub fn converted(rate: ExchangeRate) -> Self {
        if rate.target == rate.base {
            return Self::identity();
        }
        Self {
            base: rate.base,
            display: rate.target,
            rate: Some(rate.rate),
            advisory: None,
        }
    }

    /// Storage currency.
    #[must_use]
    pub const fn base(&self) -> Currency {
        self.base
    }

    /// Effective display currency.
    #[must_use]
    pub const fn display(&self) -> Currency {
        self.display
    }

    /// Display units per base unit; `None` when not converting.
    #[must_use]
    pub const fn rate(&self) -> Option<Decimal> {
        self.rate
    }

    /// Non-blocking message for the caller, set when the rate lookup failed.
    #[must_use]
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Returns true if amounts are multiplied by a rate.
    #[must_use]
    pub fn is_converting(&self) -> bool {
        self.display != self.base && self.rate.is_some()
    }

    /// Converts a base amount to display units without rounding.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Overflow` if the product does not fit.
    pub fn to_display(&self, amount_in_base: Decimal) -> Result<Decimal, CurrencyError> {
        match self.rate {
            Some(rate) if self.display != self.base => amount_in_base
                .checked_mul(rate)
                .ok_or_else(|| CurrencyError::Overflow(amount_in_base.to_string())),
            _ => Ok(amount_in_base),
        }
    }

    /// Converts a base amount to display units rounded to cents.
    ///
    /// # Errors
    ///
    /// See [`DisplayContext::to_display`].
    pub fn to_display_rounded(&self, amount_in_base: Decimal) -> Result<Decimal, CurrencyError> {
        self.to_display(amount_in_base).map(round_money)
    }

    /// Formats a base amount in the display currency, e.g. `₱1,009.80`.
    ///
    /// # Errors
    ///
    /// See [`DisplayContext::to_display`].
    pub fn format(&self, amount_in_base: Decimal) -> Result<String, CurrencyError> {
        let amount = self.to_display_rounded(amount_in_base)?;
        Ok(Money::new(amount, self.display).to_string())
    }

    /// Converts a user-entered display amount to the base currency for storage.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidAmount` if the rounded result is not
    /// strictly positive or exceeds [`MAX_AMOUNT`](daybook_shared::types::MAX_AMOUNT).
    pub fn to_base(&self, amount_in_display: Decimal) -> Result<Decimal, CurrencyError> {
        let unrounded = match self.rate {
            Some(rate) if self.display != self.base => amount_in_display
                .checked_div(rate)
                .ok_or_else(|| CurrencyError::InvalidAmount(amount_in_display.to_string()))?,
            _ => amount_in_display,
        };

        let amount = round_money(unrounded);
        if !is_valid_amount(amount) || !is_within_limit(amount) {
            return Err(CurrencyError::InvalidAmount(amount.to_string()));
        }
        Ok(amount)
    }
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self::identity()
    }
}
