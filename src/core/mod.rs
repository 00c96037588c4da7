pub mod cache;
pub mod client;
pub mod metrics;
pub mod summary;

pub use crate::domain::model::{
    Breakdown, CacheKey, CurrencyPair, DailyMetric, Fetched, RateOrigin, RateSeries, RateValue,
    Report, TotalsSummary,
};
pub use crate::domain::ports::{ConfigProvider, FallbackSource, RateProvider};
pub use crate::utils::error::Result;
