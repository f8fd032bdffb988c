//! Shared helpers for router tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Duration;
use chrono_tz::Tz;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tower::ServiceExt;

use daybook_core::currency::{CurrencyError, ExchangeRate, RateService, RateSource};
use daybook_core::ledger::{InMemoryTransactionStore, LedgerService};
use daybook_core::reports::ReportCache;
use daybook_shared::JwtService;
use daybook_shared::config::JwtConfig;
use daybook_shared::types::{Currency, UserId};

use crate::AppState;

const TEST_SECRET: &str = "test-secret-key-that-is-long-enough";

/// A rate source that is always unreachable.
pub struct OfflineRates;

#[async_trait]
impl RateSource for OfflineRates {
    async fn fetch(&self, _: Currency, _: Currency) -> Result<ExchangeRate, CurrencyError> {
        Err(CurrencyError::RateUnavailable("offline".into()))
    }
}

/// A rate source that always returns the same rate.
pub struct FixedRates(pub Decimal);

#[async_trait]
impl RateSource for FixedRates {
    async fn fetch(&self, base: Currency, target: Currency) -> Result<ExchangeRate, CurrencyError> {
        ExchangeRate::new(base, target, self.0, None)
    }
}

/// App state over an empty in-memory store.
pub fn state_with(source: Arc<dyn RateSource>) -> AppState {
    let ledger = LedgerService::new(
        Arc::new(InMemoryTransactionStore::new()),
        RateService::new(source),
        ReportCache::new(),
        Tz::UTC,
    );
    let jwt = JwtService::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        audience: Some("authenticated".to_string()),
    });

    AppState {
        ledger: Arc::new(ledger),
        jwt_service: Arc::new(jwt),
    }
}

/// App state whose rate source always fails.
pub fn offline_state() -> AppState {
    state_with(Arc::new(OfflineRates))
}

/// Issues a bearer token for `owner`.
pub fn token(state: &AppState, owner: UserId) -> String {
    state
        .jwt_service
        .generate_access_token(owner, Duration::hours(1))
        .expect("should generate token")
}

/// Sends a request and returns the status and raw body text.
pub async fn send_text(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Sends a request and parses the JSON body.
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, text) = send_text(app, request).await;
    let json = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    (status, json)
}
