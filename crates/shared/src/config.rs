//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Exchange rate source configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Monthly report cache configuration.
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Calendar and timestamp localization.
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
///
/// Tokens are issued by the external auth provider; this service only verifies them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Shared secret used to verify token signatures.
    pub secret: String,
    /// Expected `aud` claim. `None` disables the audience check.
    #[serde(default = "default_audience")]
    pub audience: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_audience() -> Option<String> {
    Some("authenticated".to_string())
}

/// Exchange rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the currency API; `{base}.min.json` is appended.
    #[serde(default = "default_rates_url")]
    pub source_url: String,
    /// How long a fetched rate stays valid.
    #[serde(default = "default_rate_ttl")]
    pub cache_ttl_secs: u64,
    /// Request timeout for the rate source.
    #[serde(default = "default_rate_timeout")]
    pub timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            source_url: default_rates_url(),
            cache_ttl_secs: default_rate_ttl(),
            timeout_secs: default_rate_timeout(),
        }
    }
}

fn default_rates_url() -> String {
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies".to_string()
}

fn default_rate_ttl() -> u64 {
    3600 // 1 hour
}

fn default_rate_timeout() -> u64 {
    5
}

/// Monthly report cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Maximum number of cached monthly reports.
    #[serde(default = "default_report_capacity")]
    pub cache_capacity: u64,
    /// Time-to-live for a cached report.
    #[serde(default = "default_report_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_report_capacity(),
            cache_ttl_secs: default_report_ttl(),
        }
    }
}

fn default_report_capacity() -> u64 {
    1000
}

fn default_report_ttl() -> u64 {
    300 // 5 minutes
}

/// Localization settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// IANA time zone used for "today" and export timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DAYBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
