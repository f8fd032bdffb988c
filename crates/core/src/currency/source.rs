//! External exchange-rate sources.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use daybook_shared::config::RatesConfig;
use daybook_shared::types::Currency;

use super::error::CurrencyError;
use super::exchange::ExchangeRate;

/// Supplies the current rate between two currencies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches how many `target` units one `base` unit buys.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::RateUnavailable` on any network or payload problem.
    async fn fetch(&self, base: Currency, target: Currency) -> Result<ExchangeRate, CurrencyError>;
}

/// Reads the public currency API's per-base document, e.g. `.../usd.min.json`.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    base_url: String,
}

impl HttpRateSource {
    /// Creates a source rooted at `base_url` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::RateUnavailable` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CurrencyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CurrencyError::RateUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Creates a source from the `rates` config section.
    ///
    /// # Errors
    ///
    /// See [`HttpRateSource::new`].
    pub fn from_config(config: &RatesConfig) -> Result<Self, CurrencyError> {
        Self::new(
            config.source_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn document_url(&self, base: Currency) -> String {
        format!(
            "{}/{}.min.json",
            self.base_url.trim_end_matches('/'),
            base.code().to_lowercase()
        )
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self, base: Currency, target: Currency) -> Result<ExchangeRate, CurrencyError> {
        let url = self.document_url(base);
        tracing::debug!(%url, %target, "Fetching exchange rate");

        let body: Value = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| CurrencyError::RateUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| CurrencyError::RateUnavailable(e.to_string()))?;

        parse_rate_payload(&body, base, target)
    }
}

/// Extracts `payload[base][target]` from a rate document such as
/// `{"date": "2025-10-01", "usd": {"php": 56.1}}`.
///
/// # Errors
///
/// Returns `CurrencyError::RateUnavailable` if the entry is missing, not a
/// number, or not positive.
pub fn parse_rate_payload(
    payload: &Value,
    base: Currency,
    target: Currency,
) -> Result<ExchangeRate, CurrencyError> {
    let base_key = base.code().to_lowercase();
    let target_key = target.code().to_lowercase();

    let number = payload
        .get(&base_key)
        .and_then(|rates| rates.get(&target_key))
        .and_then(Value::as_number)
        .ok_or_else(|| {
            CurrencyError::RateUnavailable(format!("no {base_key}->{target_key} rate in payload"))
        })?;

    // Read the literal text so the rate never passes through binary floating point.
    let text = number.to_string();
    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| CurrencyError::RateUnavailable(format!("unreadable rate {text}")))?;

    let as_of = payload
        .get("date")
        .and_then(Value::as_str)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    ExchangeRate::new(base, target, rate, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_rate_payload() {
        let payload = json!({
            "date": "2025-10-01",
            "usd": { "eur": 0.85, "php": 58.0723 }
        });

        let rate = parse_rate_payload(&payload, Currency::Usd, Currency::Php).unwrap();
        assert_eq!(rate.rate, dec!(58.0723));
        assert_eq!(rate.target, Currency::Php);
        assert_eq!(rate.as_of, NaiveDate::from_ymd_opt(2025, 10, 1));
    }

    #[test]
    fn test_parse_rate_payload_without_date() {
        let payload = json!({ "usd": { "php": 56 } });
        let rate = parse_rate_payload(&payload, Currency::Usd, Currency::Php).unwrap();
        assert_eq!(rate.rate, dec!(56));
        assert!(rate.as_of.is_none());
    }

    #[test]
    fn test_parse_rate_payload_rejects_missing_or_bad_entries() {
        let missing = json!({ "usd": { "eur": 0.85 } });
        let wrong_base = json!({ "eur": { "php": 60.0 } });
        let text = json!({ "usd": { "php": "56.1" } });
        let zero = json!({ "usd": { "php": 0 } });

        for payload in [missing, wrong_base, text, zero] {
            let err = parse_rate_payload(&payload, Currency::Usd, Currency::Php).unwrap_err();
            assert!(matches!(err, CurrencyError::RateUnavailable(_)));
        }
    }

    #[test]
    fn test_document_url() {
        let source = HttpRateSource::new("https://rates.test/v1/currencies/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            source.document_url(Currency::Usd),
            "https://rates.test/v1/currencies/usd.min.json"
        );
    }
}
