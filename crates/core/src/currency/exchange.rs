//! Exchange rate types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use daybook_shared::types::Currency;

use super::error::CurrencyError;

/// Upper bound on a usable rate, in target units per base unit.
pub const MAX_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// A current exchange rate: `rate` units of `target` per one unit of `base`.
///
/// Rates are never persisted and carry no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Storage currency.
    pub base: Currency,
    /// Display currency.
    pub target: Currency,
    /// Target units per base unit. Always positive.
    pub rate: Decimal,
    /// Publication date reported by the source, if any.
    pub as_of: Option<NaiveDate>,
}

impl ExchangeRate {
    /// Creates a rate, rejecting zero, negative and implausibly large values.
    pub fn new(
        base: Currency,
        target: Currency,
        rate: Decimal,
        as_of: Option<NaiveDate>,
    ) -> Result<Self, CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::RateUnavailable(format!(
                "non-positive rate {rate} for {base}->{target}"
            )));
        }
        if rate > MAX_RATE {
            return Err(CurrencyError::RateUnavailable(format!(
                "rate {rate} for {base}->{target} exceeds {MAX_RATE}"
            )));
        }
        Ok(Self {
            base,
            target,
            rate,
            as_of,
        })
    }

    /// The 1:1 rate of a currency to itself.
    #[must_use]
    pub const fn identity(currency: Currency) -> Self {
        Self {
            base: currency,
            target: currency,
            rate: Decimal::ONE,
            as_of: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_rejects_non_positive_rate() {
        assert!(ExchangeRate::new(Currency::Usd, Currency::Php, dec!(0), None).is_err());
        assert!(ExchangeRate::new(Currency::Usd, Currency::Php, dec!(-1), None).is_err());

        let rate = ExchangeRate::new(Currency::Usd, Currency::Php, dec!(56.1), None).unwrap();
        assert_eq!(rate.rate, dec!(56.1));
    }

    #[test]
    fn test_new_rejects_implausible_rate() {
        assert!(ExchangeRate::new(Currency::Usd, Currency::Php, MAX_RATE, None).is_ok());
        let err = ExchangeRate::new(Currency::Usd, Currency::Php, dec!(1000000.01), None).unwrap_err();
        assert!(matches!(err, CurrencyError::RateUnavailable(_)));
    }

    #[test]
    fn test_identity() {
        let rate = ExchangeRate::identity(Currency::Usd);
        assert_eq!(rate.target, Currency::Usd);
        assert_eq!(rate.rate, Decimal::ONE);
    }
}
