use crate::utils::error::FxError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self::new("EUR", "USD")
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// A single day's observation: either a currency-keyed bundle or a bare rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    Single(f64),
    Bundle(BTreeMap<String, Option<f64>>),
}

impl RateValue {
    pub fn quote(&self, currency: &str) -> Option<f64> {
        match self {
            RateValue::Single(rate) => Some(*rate),
            RateValue::Bundle(rates) => rates.get(currency).copied().flatten(),
        }
    }
}

/// Date-ordered rate observations. Dates are unique but not necessarily contiguous.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSeries(BTreeMap<NaiveDate, RateValue>);

impl RateSeries {
    pub fn new(rates: BTreeMap<NaiveDate, RateValue>) -> Self {
        Self(rates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&RateValue> {
        self.0.get(date)
    }

    /// Ascending by date.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &RateValue)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<NaiveDate, RateValue> {
        self.0
    }
}

impl FromIterator<(NaiveDate, RateValue)> for RateSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, RateValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Logical cache key. Distinct queries always produce distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Range {
        start: NaiveDate,
        end: NaiveDate,
        pair: CurrencyPair,
    },
    Latest {
        pair: CurrencyPair,
    },
}

impl CacheKey {
    pub fn range(start: NaiveDate, end: NaiveDate, pair: &CurrencyPair) -> Self {
        CacheKey::Range {
            start,
            end,
            pair: pair.clone(),
        }
    }

    pub fn latest(pair: &CurrencyPair) -> Self {
        CacheKey::Latest { pair: pair.clone() }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Range { start, end, pair } => {
                write!(f, "range:{}:{}:{}:{}", start, end, pair.base, pair.quote)
            }
            CacheKey::Latest { pair } => write!(f, "latest:{}:{}", pair.base, pair.quote),
        }
    }
}

/// Where a series returned by the rate client came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    Cache,
    Upstream,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub series: RateSeries,
    pub origin: RateOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub rate: f64,
    pub pct_change: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsSummary {
    pub start_rate: Option<f64>,
    pub end_rate: Option<f64>,
    pub total_pct_change: Option<f64>,
    pub mean_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakdown {
    #[default]
    Day,
    None,
}

impl FromStr for Breakdown {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Breakdown::Day),
            "none" => Ok(Breakdown::None),
            other => Err(FxError::InvalidInput {
                field: "breakdown".to_string(),
                value: other.to_string(),
                reason: "Breakdown must be 'day' or 'none'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breakdown::Day => f.write_str("day"),
            Breakdown::None => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub base: String,
    #[serde(rename = "symbol")]
    pub quote: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub breakdown: Breakdown,
    pub totals: TotalsSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyMetric>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRate {
    pub base: String,
    #[serde(rename = "symbol")]
    pub quote: String,
    pub date: NaiveDate,
    pub rate: f64,
}
