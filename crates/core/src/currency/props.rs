//! Property-based tests for display conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use daybook_shared::types::{Currency, round_money};

use super::conversion::DisplayContext;
use super::exchange::ExchangeRate;

/// Strategy to generate positive base amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate unrounded base amounts with up to 4 decimal places.
fn raw_amount() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate display rates of at least one display unit per base
/// unit (1.0000 to 1000.0000), the range of the supported currencies.
fn display_rate() -> impl Strategy<Value = Decimal> {
    (10_000i64..=10_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn php(rate: Decimal) -> DisplayContext {
    DisplayContext::converted(
        ExchangeRate::new(Currency::Usd, Currency::Php, rate, None).expect("positive rate"),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Converting to display and back to base recovers the rounded amount.
    #[test]
    fn prop_round_trip_recovers_rounded_amount(
        amount in raw_amount(),
        rate in positive_rate(),
    ) {
        let ctx = php(rate);
        let back = ctx.to_base(ctx.to_display(amount).expect("bounded product"));

        if round_money(amount) > Decimal::ZERO {
            prop_assert_eq!(back.expect("positive amount"), round_money(amount));
        } else {
            prop_assert!(back.is_err());
        }
    }

    /// Round-tripping a display amount that was itself rounded stays within a cent.
    #[test]
    fn prop_round_trip_through_rounded_display_within_one_cent(
        amount in positive_amount(),
        rate in display_rate(),
    ) {
        let ctx = php(rate);
        let shown = ctx.to_display_rounded(amount).expect("bounded product");
        let back = ctx.to_base(shown).expect("positive amount");

        prop_assert!(
            (back - amount).abs() <= Decimal::new(1, 2),
            "{} came back as {}",
            amount,
            back
        );
    }

    /// The identity context never changes an amount.
    #[test]
    fn prop_identity_is_neutral(amount in positive_amount()) {
        let ctx = DisplayContext::identity();
        prop_assert_eq!(ctx.to_display(amount).expect("identity"), amount);
        prop_assert_eq!(ctx.to_base(amount).expect("positive amount"), amount);
    }
}
