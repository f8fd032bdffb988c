//! Display-currency conversion and exchange rates.
//!
//! Amounts are stored in the base currency. A request resolves a
//! [`DisplayContext`] through [`RateService`]; a failed rate lookup degrades to
//! the base currency with an advisory instead of failing the request.

pub mod conversion;
pub mod error;
pub mod exchange;
pub mod service;
pub mod source;

#[cfg(test)]
mod props;

pub use conversion::{DisplayContext, RATE_UNAVAILABLE_ADVISORY};
pub use error::CurrencyError;
pub use exchange::{ExchangeRate, MAX_RATE};
pub use service::RateService;
pub use source::{HttpRateSource, RateSource, parse_rate_payload};
