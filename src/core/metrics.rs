//! Daily percentage changes and aggregate totals over a rate series.
//!
//! Everything here is a pure function of its inputs. Rates are rounded to 6
//! decimal places and percentage changes to 4, once, when a value is emitted.

use crate::domain::model::{Breakdown, CurrencyPair, DailyMetric, RateSeries, Report, TotalsSummary};
use chrono::NaiveDate;

const RATE_DECIMALS: usize = 6;
const PCT_DECIMALS: usize = 4;

/// Rounds to `decimals` places from the exact binary value, ties to even.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Percentage change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero or the result is not finite, so a
/// division by zero never reaches the output as `NaN` or infinity.
pub fn safe_pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        tracing::warn!("Encountered zero denominator in percentage change calculation");
        return None;
    }
    Some((current - previous) / previous * 100.0).filter(|pct| pct.is_finite())
}

/// Emits one metric per date that carries the `quote` rate, in ascending date order.
///
/// Dates without a `quote` rate are skipped and do not break the change chain:
/// each change is measured against the previous *emitted* rate.
pub fn compute_daily_metrics(series: &RateSeries, quote: &str) -> Vec<DailyMetric> {
    let mut metrics = Vec::with_capacity(series.len());
    let mut previous: Option<f64> = None;

    for (date, value) in series.iter() {
        let Some(rate) = value.quote(quote).filter(|r| r.is_finite()) else {
            tracing::warn!("No {} rate found for {}", quote, date);
            continue;
        };

        let pct_change = previous
            .and_then(|prev| safe_pct_change(prev, rate))
            .map(|pct| round_to(pct, PCT_DECIMALS));

        metrics.push(DailyMetric {
            date: *date,
            rate: round_to(rate, RATE_DECIMALS),
            pct_change,
        });
        previous = Some(rate);
    }

    metrics
}

pub fn compute_totals(daily: &[DailyMetric]) -> TotalsSummary {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return TotalsSummary::default();
    };

    let mean = daily.iter().map(|m| m.rate).sum::<f64>() / daily.len() as f64;

    TotalsSummary {
        start_rate: Some(first.rate),
        end_rate: Some(last.rate),
        total_pct_change: safe_pct_change(first.rate, last.rate)
            .map(|pct| round_to(pct, PCT_DECIMALS)),
        mean_rate: Some(round_to(mean, RATE_DECIMALS)),
    }
}

pub fn format_report(
    daily: Vec<DailyMetric>,
    totals: TotalsSummary,
    breakdown: Breakdown,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pair: &CurrencyPair,
) -> Report {
    Report {
        base: pair.base.clone(),
        quote: pair.quote.clone(),
        start_date,
        end_date,
        breakdown,
        totals,
        daily: match breakdown {
            Breakdown::Day => Some(daily),
            Breakdown::None => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RateValue;
    use std::collections::BTreeMap;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bare(values: &[(&str, f64)]) -> RateSeries {
        values
            .iter()
            .map(|(d, v)| (date(d), RateValue::Single(*v)))
            .collect()
    }

    fn bundle(rates: &[(&str, f64)]) -> RateValue {
        RateValue::Bundle(
            rates
                .iter()
                .map(|(c, v)| (c.to_string(), Some(*v)))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_two_day_series_rounding() {
        let series = bare(&[("2025-01-01", 1.10), ("2025-01-02", 1.21)]);

        let daily = compute_daily_metrics(&series, "USD");

        assert_eq!(
            daily,
            vec![
                DailyMetric {
                    date: date("2025-01-01"),
                    rate: 1.1,
                    pct_change: None,
                },
                DailyMetric {
                    date: date("2025-01-02"),
                    rate: 1.21,
                    pct_change: Some(10.0),
                },
            ]
        );

        let totals = compute_totals(&daily);
        assert_eq!(
            totals,
            TotalsSummary {
                start_rate: Some(1.1),
                end_rate: Some(1.21),
                total_pct_change: Some(10.0),
                mean_rate: Some(1.155),
            }
        );
    }

    #[test]
    fn test_empty_series() {
        let daily = compute_daily_metrics(&RateSeries::default(), "USD");
        assert!(daily.is_empty());

        let totals = compute_totals(&daily);
        assert_eq!(totals, TotalsSummary::default());
        assert!(totals.start_rate.is_none());
        assert!(totals.mean_rate.is_none());
    }

    #[test]
    fn test_zero_rate_guard() {
        let series = bare(&[
            ("2025-01-01", 1.05),
            ("2025-01-02", 0.0),
            ("2025-01-03", 1.07),
        ]);

        let daily = compute_daily_metrics(&series, "USD");

        assert_eq!(daily.len(), 3);
        assert_eq!(daily[1].rate, 0.0);
        assert_eq!(daily[1].pct_change, Some(-100.0));
        // 0 → 非零：不可出現 inf 或 NaN
        assert_eq!(daily[2].pct_change, None);
    }

    #[test]
    fn test_totals_zero_start_rate() {
        let daily = compute_daily_metrics(&bare(&[("2025-01-01", 0.0), ("2025-01-02", 1.0)]), "USD");
        let totals = compute_totals(&daily);

        assert_eq!(totals.start_rate, Some(0.0));
        assert_eq!(totals.total_pct_change, None);
        assert_eq!(totals.mean_rate, Some(0.5));
    }

    #[test]
    fn test_dates_missing_quote_are_skipped_from_chain() {
        let series: RateSeries = [
            (date("2025-01-02"), bundle(&[("USD", 1.0)])),
            (date("2025-01-03"), bundle(&[("GBP", 0.83)])),
            (date("2025-01-06"), bundle(&[("USD", 1.02), ("GBP", 0.84)])),
        ]
        .into_iter()
        .collect();

        let daily = compute_daily_metrics(&series, "USD");

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].date, date("2025-01-06"));
        // 與前一個「輸出」的日期比較，而非前一個日曆日
        assert_eq!(daily[1].pct_change, Some(2.0));
    }

    #[test]
    fn test_output_is_strictly_increasing_and_bounded() {
        let series: RateSeries = serde_json::from_value(serde_json::json!({
            "2025-01-10": {"USD": 1.0304},
            "2025-01-02": {"USD": 1.0321},
            "2025-01-07": {"JPY": 163.2},
            "2025-01-03": 1.0299
        }))
        .unwrap();

        let daily = compute_daily_metrics(&series, "USD");

        assert!(daily.len() <= series.len());
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(daily.first().unwrap().date, date("2025-01-02"));
        assert_eq!(daily.last().unwrap().date, date("2025-01-10"));
    }

    #[test]
    fn test_rounding_happens_at_emission() {
        let series = bare(&[("2025-01-02", 1.03214449), ("2025-01-03", 1.02991234)]);

        let daily = compute_daily_metrics(&series, "USD");

        assert_eq!(daily[0].rate, 1.032144);
        assert_eq!(daily[1].rate, 1.029912);
        // 以未四捨五入的原始匯率計算變動
        let expected = round_to((1.02991234 - 1.03214449) / 1.03214449 * 100.0, 4);
        assert_eq!(daily[1].pct_change, Some(expected));
        assert_eq!(expected, -0.2163);
    }

    #[test]
    fn test_round_to_uses_exact_binary_value() {
        // 1.0000015 的二進位值略小於 .5，不可進位
        assert_eq!(round_to(1.0000015, 6), 1.000001);
        assert_eq!(round_to(1.0293355, 6), 1.029335);
        assert_eq!(round_to(1.1234567, 6), 1.123457);
        assert_eq!(round_to(-0.21627, 4), -0.2163);
        assert!(round_to(f64::NAN, 4).is_nan());

        let daily = compute_daily_metrics(&bare(&[("2025-01-01", 1.0000015)]), "USD");
        assert_eq!(daily[0].rate, 1.000001);
    }

    #[test]
    fn test_null_quote_is_skipped() {
        let series: RateSeries = serde_json::from_value(serde_json::json!({
            "2025-01-02": {"USD": 1.0},
            "2025-01-03": {"USD": null},
            "2025-01-06": {"USD": 1.02}
        }))
        .unwrap();

        let daily = compute_daily_metrics(&series, "USD");

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].date, date("2025-01-06"));
        assert_eq!(daily[1].pct_change, Some(2.0));
    }

    #[test]
    fn test_format_report_none_omits_daily() {
        let daily = compute_daily_metrics(&bare(&[("2025-01-01", 1.10), ("2025-01-02", 1.21)]), "USD");
        let totals = compute_totals(&daily);

        let report = format_report(
            daily.clone(),
            totals.clone(),
            Breakdown::None,
            date("2025-01-01"),
            date("2025-01-02"),
            &CurrencyPair::default(),
        );

        assert!(report.daily.is_none());
        assert_eq!(report.totals, totals);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("daily").is_none());
        assert_eq!(json["totals"]["end_rate"], 1.21);

        let report = format_report(
            daily.clone(),
            totals,
            Breakdown::Day,
            date("2025-01-01"),
            date("2025-01-02"),
            &CurrencyPair::default(),
        );
        assert_eq!(report.daily, Some(daily));
        assert_eq!(report.base, "EUR");
        assert_eq!(report.quote, "USD");
    }
}
