//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.
//!
//! Every stored or derived monetary value goes through [`round_money`]:
//! two decimal places, banker's rounding (round half to even).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept for every monetary value.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Largest storable amount, `999,999,999,999.99`: the range of a
/// `NUMERIC(14,2)` column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, MONEY_DECIMAL_PLACES);

/// Rounds a monetary value to 2 decimal places using banker's rounding.
///
/// `2.345` becomes `2.34`, `2.355` becomes `2.36`. The rule is applied on the
/// entry path, in aggregation, in display conversion and in CSV export alike.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount can be stored: strictly positive.
///
/// `Decimal` has no NaN or infinity, so finiteness holds by construction.
#[must_use]
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}

/// Returns true if the amount fits the storage range.
#[must_use]
pub fn is_within_limit(amount: Decimal) -> bool {
    amount <= MAX_AMOUNT
}

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g., dollars).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes accepted for display and export.
///
/// Amounts are always stored in [`Currency::BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Philippine Peso
    Php,
}

impl Currency {
    /// The storage currency.
    pub const BASE: Self = Self::Usd;

    /// Every currency on the allow-list.
    pub const ALL: [Self; 2] = [Self::Usd, Self::Php];

    /// Returns the uppercase ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Php => "PHP",
        }
    }

    /// Returns the display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Php => "\u{20b1}",
        }
    }

    /// Returns true for the storage currency.
    #[must_use]
    pub fn is_base(self) -> bool {
        self == Self::BASE
    }

    /// Resolves an optional query parameter against the allow-list.
    ///
    /// Missing or unrecognized codes fall back to the base currency.
    #[must_use]
    pub fn from_query(code: Option<&str>) -> Self {
        code.and_then(|c| c.parse().ok()).unwrap_or(Self::BASE)
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the same money rounded with [`round_money`].
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(round_money(self.amount), self.currency)
    }
}

/// Formats as en-US currency text, e.g. `$1,234.50` or `-₱12.00`.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = round_money(self.amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        write!(
            f,
            "{sign}{}{}.{cents}",
            self.currency.symbol(),
            group_thousands(whole)
        )
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "PHP" => Ok(Self::Php),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod money_tests;
