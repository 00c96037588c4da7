use crate::core::cache::{CacheStats, RateCache};
use crate::domain::model::{CacheKey, CurrencyPair, Fetched, RateOrigin, RateSeries};
use crate::domain::ports::{FallbackSource, RateProvider};
use crate::utils::error::{FxError, Result};
use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache → upstream → fallback orchestration for both query shapes.
pub struct RateClient<P: RateProvider, F: FallbackSource> {
    provider: P,
    fallback: F,
    cache: RateCache,
    timeout: Duration,
}

impl<P: RateProvider, F: FallbackSource> RateClient<P, F> {
    pub fn new(provider: P, fallback: F, cache: RateCache) -> Self {
        Self {
            provider,
            fallback,
            cache,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn get_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        pair: &CurrencyPair,
    ) -> Result<RateSeries> {
        Ok(self.fetch_range(start, end, pair).await?.series)
    }

    pub async fn get_latest(&self, pair: &CurrencyPair) -> Result<RateSeries> {
        Ok(self.fetch_latest(pair).await?.series)
    }

    pub async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        pair: &CurrencyPair,
    ) -> Result<Fetched> {
        let key = CacheKey::range(start, end, pair);
        tracing::info!(%key, "Fetching FX range {}..{}", start, end);
        self.resolve(key, self.provider.fetch_range(start, end, pair))
            .await
    }

    pub async fn fetch_latest(&self, pair: &CurrencyPair) -> Result<Fetched> {
        let key = CacheKey::latest(pair);
        tracing::info!(%key, "Fetching latest FX rate");
        self.resolve(key, self.provider.fetch_latest(pair)).await
    }

    /// Releases cached state. Called once at shutdown.
    pub fn shutdown(&self) {
        self.cache.clear();
        tracing::info!("FX client closed");
    }

    async fn resolve(
        &self,
        key: CacheKey,
        upstream: impl Future<Output = Result<RateSeries>>,
    ) -> Result<Fetched> {
        if let Some(series) = self.cache.get(&key) {
            return Ok(Fetched {
                series,
                origin: RateOrigin::Cache,
            });
        }

        let outcome = match tokio::time::timeout(self.timeout, upstream).await {
            Ok(result) => result,
            Err(_) => Err(FxError::UpstreamTimeoutError {
                timeout_secs: self.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(series) => {
                self.cache.set(key, series.clone());
                Ok(Fetched {
                    series,
                    origin: RateOrigin::Upstream,
                })
            }
            Err(e) => {
                // 上游錯誤只記錄，不回傳給呼叫端
                tracing::error!(%key, error = %e, "Failed to fetch from upstream, using fallback");
                let series = self.load_fallback()?;
                Ok(Fetched {
                    series,
                    origin: RateOrigin::Fallback,
                })
            }
        }
    }

    fn load_fallback(&self) -> Result<RateSeries> {
        self.fallback.load().map_err(|e| {
            tracing::error!(error = %e, "Failed to load fallback data");
            match e {
                FxError::DataUnavailable { .. } => e,
                other => FxError::DataUnavailable {
                    message: other.to_string(),
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RateValue;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(values: &[(&str, f64)]) -> RateSeries {
        values
            .iter()
            .map(|(d, v)| (date(d), RateValue::Single(*v)))
            .collect()
    }

    enum Behaviour {
        Succeed(RateSeries),
        Fail,
        Hang,
    }

    #[derive(Clone)]
    struct MockProvider {
        behaviour: Arc<Behaviour>,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour: Arc::new(behaviour),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn respond(&self) -> Result<RateSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour.as_ref() {
                Behaviour::Succeed(series) => Ok(series.clone()),
                Behaviour::Fail => Err(FxError::UpstreamStatusError {
                    status: 500,
                    url: "http://mock".to_string(),
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(RateSeries::default())
                }
            }
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        async fn fetch_range(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _pair: &CurrencyPair,
        ) -> Result<RateSeries> {
            self.respond().await
        }

        async fn fetch_latest(&self, _pair: &CurrencyPair) -> Result<RateSeries> {
            self.respond().await
        }
    }

    struct MockFallback(Option<RateSeries>);

    impl FallbackSource for MockFallback {
        fn load(&self) -> Result<RateSeries> {
            self.0.clone().ok_or_else(|| FxError::DataUnavailable {
                message: "snapshot missing".to_string(),
            })
        }
    }

    fn upstream_series() -> RateSeries {
        series(&[("2025-01-02", 1.0321), ("2025-01-03", 1.0299)])
    }

    fn snapshot_series() -> RateSeries {
        series(&[("2024-12-31", 1.0389)])
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let provider = MockProvider::new(Behaviour::Succeed(upstream_series()));
        let client = RateClient::new(
            provider.clone(),
            MockFallback(None),
            RateCache::default(),
        );
        let pair = CurrencyPair::default();

        let first = client
            .fetch_range(date("2025-01-01"), date("2025-01-03"), &pair)
            .await
            .unwrap();
        let second = client
            .fetch_range(date("2025-01-01"), date("2025-01-03"), &pair)
            .await
            .unwrap();

        assert_eq!(first.origin, RateOrigin::Upstream);
        assert_eq!(second.origin, RateOrigin::Cache);
        assert_eq!(first.series, second.series);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_triggers_new_upstream_call() {
        let provider = MockProvider::new(Behaviour::Succeed(upstream_series()));
        let client = RateClient::new(
            provider.clone(),
            MockFallback(None),
            RateCache::new(Duration::from_secs(300)),
        );
        let pair = CurrencyPair::default();

        client.get_latest(&pair).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        let again = client.fetch_latest(&pair).await.unwrap();

        assert_eq!(again.origin, RateOrigin::Upstream);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_returns_snapshot_exactly() {
        let provider = MockProvider::new(Behaviour::Fail);
        let client = RateClient::new(
            provider.clone(),
            MockFallback(Some(snapshot_series())),
            RateCache::default(),
        );

        let fetched = client
            .fetch_range(
                date("2025-01-01"),
                date("2025-01-03"),
                &CurrencyPair::default(),
            )
            .await
            .unwrap();

        assert_eq!(fetched.origin, RateOrigin::Fallback);
        assert_eq!(fetched.series, snapshot_series());
        // fallback 結果不寫入快取
        assert_eq!(client.cache_stats().stores, 0);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates_data_unavailable() {
        let client = RateClient::new(
            MockProvider::new(Behaviour::Fail),
            MockFallback(None),
            RateCache::default(),
        );

        let err = client
            .get_latest(&CurrencyPair::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FxError::DataUnavailable { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_timeout_falls_back_without_retry() {
        let provider = MockProvider::new(Behaviour::Hang);
        let client = RateClient::new(
            provider.clone(),
            MockFallback(Some(snapshot_series())),
            RateCache::default(),
        );

        let started = tokio::time::Instant::now();
        let fetched = client
            .fetch_latest(&CurrencyPair::default())
            .await
            .unwrap();

        assert_eq!(fetched.origin, RateOrigin::Fallback);
        assert!(started.elapsed() >= DEFAULT_UPSTREAM_TIMEOUT);
        assert!(started.elapsed() < Duration::from_secs(3600));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_clears_cache() {
        let client = RateClient::new(
            MockProvider::new(Behaviour::Succeed(upstream_series())),
            MockFallback(None),
            RateCache::default(),
        );
        client.get_latest(&CurrencyPair::default()).await.unwrap();
        assert_eq!(client.cache_stats().entries, 1);

        client.shutdown();
        assert_eq!(client.cache_stats().entries, 0);
    }
}
