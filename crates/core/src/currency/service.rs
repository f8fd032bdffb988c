//! Cached rate lookup and display-context resolution.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use daybook_shared::config::RatesConfig;
use daybook_shared::types::Currency;

use super::conversion::DisplayContext;
use super::error::CurrencyError;
use super::exchange::ExchangeRate;
use super::source::RateSource;

/// Default time-to-live for a fetched rate (1 hour).
const DEFAULT_RATE_TTL_SECS: u64 = 3600;

/// Maximum number of cached rates.
const RATE_CACHE_CAPACITY: u64 = 16;

/// Fetches base-to-target rates at most once per cache window.
///
/// Concurrent lookups for the same currency share a single in-flight fetch.
/// Failed fetches are not cached, so the next request tries again.
#[derive(Clone)]
pub struct RateService {
    source: Arc<dyn RateSource>,
    cache: Cache<Currency, ExchangeRate>,
}

impl RateService {
    /// Creates a service with the default one-hour window.
    #[must_use]
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_ttl(source, Duration::from_secs(DEFAULT_RATE_TTL_SECS))
    }

    /// Creates a service with a custom cache window.
    #[must_use]
    pub fn with_ttl(source: Arc<dyn RateSource>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(RATE_CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { source, cache }
    }

    /// Creates a service from the `rates` config section.
    #[must_use]
    pub fn from_config(source: Arc<dyn RateSource>, config: &RatesConfig) -> Self {
        Self::with_ttl(source, Duration::from_secs(config.cache_ttl_secs))
    }

    /// Returns the current base-to-`target` rate.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::RateUnavailable` if the source fails.
    pub async fn fetch_rate(&self, target: Currency) -> Result<ExchangeRate, CurrencyError> {
        if target.is_base() {
            return Ok(ExchangeRate::identity(Currency::BASE));
        }

        let source = Arc::clone(&self.source);
        self.cache
            .try_get_with(target, async move { source.fetch(Currency::BASE, target).await })
            .await
            .map_err(|err| (*err).clone())
    }

    /// Resolves the display context for a request.
    ///
    /// Never fails: when the rate cannot be fetched the context falls back to
    /// the base currency and carries an advisory for the caller.
    pub async fn resolve(&self, requested: Currency) -> DisplayContext {
        if requested.is_base() {
            return DisplayContext::identity();
        }

        match self.fetch_rate(requested).await {
            Ok(rate) => DisplayContext::converted(rate),
            Err(err) => {
                tracing::warn!(
                    currency = %requested,
                    error = %err,
                    "Exchange rate unavailable, falling back to base currency"
                );
                DisplayContext::degraded()
            }
        }
    }

    /// Drops every cached rate.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
