//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{
    Currency, MAX_AMOUNT, MONEY_DECIMAL_PLACES, Money, is_valid_amount, is_within_limit, round_money,
};
