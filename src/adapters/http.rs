use crate::domain::model::{CurrencyPair, RateSeries, RateValue};
use crate::domain::ports::{ConfigProvider, RateProvider};
use crate::utils::error::{FxError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.frankfurter.dev/v1";

/// Response body of the rate provider, shared by the range and latest endpoints
/// and by the fallback snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub rates: BTreeMap<String, RateValue>,
}

impl RatesPayload {
    /// Normalises either body shape into a date-keyed series.
    ///
    /// Range bodies key `rates` by date. Latest bodies key `rates` by currency
    /// and carry the observation date separately; they become a one-entry series.
    pub fn into_series(self) -> Result<RateSeries> {
        let dated: Option<RateSeries> = self
            .rates
            .iter()
            .map(|(key, value)| {
                NaiveDate::parse_from_str(key, "%Y-%m-%d")
                    .ok()
                    .map(|date| (date, value.clone()))
            })
            .collect::<Option<_>>();

        if let Some(series) = dated {
            return Ok(series);
        }

        let date = self.date.ok_or_else(|| FxError::MalformedResponseError {
            message: "rates are not keyed by date and no 'date' field is present".to_string(),
        })?;

        let mut bundle = BTreeMap::new();
        for (currency, value) in self.rates {
            match value {
                RateValue::Single(rate) => {
                    bundle.insert(currency, Some(rate));
                }
                RateValue::Bundle(_) => {
                    return Err(FxError::MalformedResponseError {
                        message: format!("unexpected nested rates for currency '{}'", currency),
                    })
                }
            }
        }

        Ok(RateSeries::from_iter([(date, RateValue::Bundle(bundle))]))
    }
}

/// Client for a Frankfurter-compatible rate API.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
}

impl HttpRateProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.upstream_url(), config.upstream_timeout())
    }

    pub async fn fetch_range_payload(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        pair: &CurrencyPair,
    ) -> Result<RatesPayload> {
        let url = format!("{}/{}..{}", self.base_url, start, end);
        let params = [("base", pair.base.as_str()), ("symbols", pair.quote.as_str())];
        self.get_payload(&url, &params).await
    }

    pub async fn fetch_latest_payload(&self, pair: &CurrencyPair) -> Result<RatesPayload> {
        let url = format!("{}/latest", self.base_url);
        let params = [("from", pair.base.as_str()), ("to", pair.quote.as_str())];
        self.get_payload(&url, &params).await
    }

    async fn get_payload(&self, url: &str, params: &[(&str, &str)]) -> Result<RatesPayload> {
        tracing::debug!("Making upstream request to: {} with params {:?}", url, params);
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        tracing::debug!("Upstream response status: {}", status);
        if !status.is_success() {
            return Err(FxError::UpstreamStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FxError::MalformedResponseError {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        pair: &CurrencyPair,
    ) -> Result<RateSeries> {
        self.fetch_range_payload(start, end, pair)
            .await?
            .into_series()
    }

    async fn fetch_latest(&self, pair: &CurrencyPair) -> Result<RateSeries> {
        self.fetch_latest_payload(pair).await?.into_series()
    }
}
