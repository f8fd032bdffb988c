//! Daybook API Server
//!
//! Main entry point for the Daybook backend service.

use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daybook_api::{AppState, create_router};
use daybook_core::currency::{HttpRateSource, RateService};
use daybook_core::ledger::LedgerService;
use daybook_core::reports::ReportCache;
use daybook_db::{TransactionRepository, connect};
use daybook_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daybook=debug,daybook_api=debug,daybook_core=debug,daybook_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let timezone: Tz = config
        .locale
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid locale.timezone {}: {e}", config.locale.timezone))?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let rate_source = HttpRateSource::from_config(&config.rates)?;
    let rates = RateService::from_config(Arc::new(rate_source), &config.rates);
    info!(source = %config.rates.source_url, ttl_secs = config.rates.cache_ttl_secs, "Rate source configured");

    let ledger = LedgerService::new(
        Arc::new(TransactionRepository::new(db)),
        rates,
        ReportCache::from_config(&config.reports),
        timezone,
    );

    let state = AppState {
        ledger: Arc::new(ledger),
        jwt_service: Arc::new(JwtService::new(&config.jwt)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%timezone, "Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
