use crate::core::client::RateClient;
use crate::core::metrics;
use crate::domain::model::{Breakdown, CurrencyPair, LatestRate, Report};
use crate::domain::ports::{FallbackSource, RateProvider};
use crate::utils::error::{FxError, Result};
use crate::utils::validation::{parse_iso_date, validate_date_range};
use chrono::NaiveDate;

/// A validated report request. Construction fails before any fetch is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub breakdown: Breakdown,
}

impl SummaryRequest {
    pub fn parse(start: &str, end: &str, breakdown: Option<&str>) -> Result<Self> {
        let start = parse_iso_date("start", start)?;
        let end = parse_iso_date("end", end)?;
        validate_date_range(start, end)?;

        let breakdown = match breakdown {
            Some(mode) => mode.parse()?,
            None => Breakdown::default(),
        };

        Ok(Self {
            start,
            end,
            breakdown,
        })
    }
}

pub async fn build_summary<P: RateProvider, F: FallbackSource>(
    client: &RateClient<P, F>,
    pair: &CurrencyPair,
    request: &SummaryRequest,
) -> Result<Report> {
    let fetched = client.fetch_range(request.start, request.end, pair).await?;
    tracing::debug!(
        origin = ?fetched.origin,
        days = fetched.series.len(),
        "Rate series resolved"
    );

    let daily = metrics::compute_daily_metrics(&fetched.series, &pair.quote);
    if daily.is_empty() {
        return Err(FxError::EmptyResult {
            start: request.start.to_string(),
            end: request.end.to_string(),
        });
    }

    let totals = metrics::compute_totals(&daily);
    Ok(metrics::format_report(
        daily,
        totals,
        request.breakdown,
        request.start,
        request.end,
        pair,
    ))
}

/// Most recent observation for the pair.
pub async fn build_latest<P: RateProvider, F: FallbackSource>(
    client: &RateClient<P, F>,
    pair: &CurrencyPair,
) -> Result<LatestRate> {
    let series = client.get_latest(pair).await?;

    let latest = metrics::compute_daily_metrics(&series, &pair.quote)
        .pop()
        .ok_or_else(|| FxError::EmptyResult {
            start: "latest".to_string(),
            end: "latest".to_string(),
        })?;

    Ok(LatestRate {
        base: pair.base.clone(),
        quote: pair.quote.clone(),
        date: latest.date,
        rate: latest.rate,
    })
}
