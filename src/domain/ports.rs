use crate::domain::model::{CurrencyPair, RateSeries};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

/// The live rate source. Any error returned here is treated as an upstream failure.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        pair: &CurrencyPair,
    ) -> Result<RateSeries>;

    async fn fetch_latest(&self, pair: &CurrencyPair) -> Result<RateSeries>;
}

/// Local snapshot used when the provider fails. Errors must surface as `DataUnavailable`.
pub trait FallbackSource: Send + Sync {
    fn load(&self) -> Result<RateSeries>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn upstream_url(&self) -> &str;
    fn upstream_timeout(&self) -> Duration;
    fn cache_ttl(&self) -> Duration;
    fn fallback_path(&self) -> &str;
    fn currency_pair(&self) -> CurrencyPair;
}
