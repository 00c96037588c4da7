pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{FxError, Result};
use crate::utils::validation::{
    validate_currency_code, validate_path, validate_positive_number, validate_url,
};

#[cfg(feature = "cli")]
use crate::domain::model::CurrencyPair;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fx-summary")]
#[command(about = "EUR->USD FX rate analysis service with day-by-day breakdown")]
pub struct CliConfig {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value = "8000")]
    pub port: u16,

    #[arg(long, default_value = crate::adapters::http::DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    #[arg(long, default_value = "10", help = "Upstream request timeout in seconds")]
    pub timeout_secs: u64,

    #[arg(long, default_value = "300", help = "Cache time-to-live in seconds")]
    pub cache_ttl_secs: u64,

    #[arg(long, default_value = crate::adapters::snapshot::DEFAULT_SNAPSHOT_PATH)]
    pub fallback_path: String,

    #[arg(long, default_value = "EUR")]
    pub base: String,

    #[arg(long, default_value = "USD")]
    pub quote: String,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    fn currency_pair(&self) -> CurrencyPair {
        CurrencyPair::new(&self.base, &self.quote)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("upstream.base_url", config.upstream_url())?;
    validate_positive_number(
        "upstream.timeout_seconds",
        config.upstream_timeout().as_secs(),
        1,
    )?;
    validate_path("fallback.path", config.fallback_path())?;

    let pair = config.currency_pair();
    validate_currency_code("currency.base", &pair.base)?;
    validate_currency_code("currency.quote", &pair.quote)?;
    if pair.base == pair.quote {
        return Err(FxError::InvalidConfigValueError {
            field: "currency.quote".to_string(),
            value: pair.quote,
            reason: "Quote currency must differ from base currency".to_string(),
        });
    }

    Ok(())
}
