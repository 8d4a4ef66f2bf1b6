//! Per-series numeric summarization.
//!
//! Pure functions over a single [`TimeSeries`]. Nothing here performs I/O
//! or fails: quantities that cannot be computed from the available data are
//! left as `None`.

use crate::models::{Direction, HistoricalContext, IndicatorSummary, MarketSummary, TimeSeries};

/// Lookback, in elements, for the year-over-year comparison.
const YOY_LOOKBACK: usize = 12;

/// Number of trailing changes used for volatility.
const VOLATILITY_WINDOW: usize = 10;

/// Minimum closes required for annualized market volatility.
const MARKET_VOLATILITY_MIN_POINTS: usize = 20;

/// Trading days per year.
const TRADING_DAYS: f64 = 252.0;

/// Summarize an indicator series.
///
/// The year-over-year figure is period-indexed: it compares against the
/// element 12 positions back, which is only a true annual comparison for
/// monthly data. With exactly 12 points it compares against the first one.
pub fn summarize(series: &TimeSeries, compute_yoy: bool) -> IndicatorSummary {
    let values: Vec<f64> = series.values().collect();

    let Some(latest) = series.last() else {
        return IndicatorSummary::default();
    };

    let recent_change = recent_change(&values);

    IndicatorSummary {
        latest_value: Some(latest.value),
        latest_timestamp: Some(latest.date),
        recent_change,
        recent_direction: Direction::from_change(recent_change),
        year_over_year_change_pct: if compute_yoy {
            year_over_year_pct(&values)
        } else {
            None
        },
        volatility: volatility(&values),
        historical_percentile: percentile_of_latest(&values),
        historical: historical_context(&values),
    }
}

/// Summarize a daily market price series.
pub fn summarize_market(series: &TimeSeries) -> MarketSummary {
    let closes: Vec<f64> = series.values().collect();

    let Some(latest) = series.last() else {
        return MarketSummary::default();
    };

    let price_change_pct = match closes.as_slice() {
        [.., prev, last] => pct_change(*prev, *last).map(|c| c * 100.0),
        _ => None,
    };

    let annualized_volatility = if closes.len() >= MARKET_VOLATILITY_MIN_POINTS {
        sample_std(&pct_changes(&closes)).map(|std| std * TRADING_DAYS.sqrt())
    } else {
        None
    };

    MarketSummary {
        latest_price: Some(latest.value),
        latest_date: Some(latest.date),
        price_change_pct,
        direction: Direction::from_change(price_change_pct),
        annualized_volatility,
    }
}

fn recent_change(values: &[f64]) -> Option<f64> {
    match values {
        [.., prev, last] => Some(last - prev),
        _ => None,
    }
}

fn year_over_year_pct(values: &[f64]) -> Option<f64> {
    if values.len() < YOY_LOOKBACK {
        return None;
    }

    let latest = *values.last()?;
    let base = values
        .len()
        .checked_sub(YOY_LOOKBACK + 1)
        .map_or(values[0], |i| values[i]);

    pct_change(base, latest).map(|c| c * 100.0)
}

/// Sample standard deviation of the trailing fractional changes.
fn volatility(values: &[f64]) -> Option<f64> {
    if values.len() < VOLATILITY_WINDOW {
        return None;
    }

    let changes = pct_changes(values);
    let start = changes.len().saturating_sub(VOLATILITY_WINDOW);
    sample_std(&changes[start..])
}

fn percentile_of_latest(values: &[f64]) -> Option<f64> {
    let latest = *values.last()?;
    let at_or_below = values.iter().filter(|v| **v <= latest).count();
    Some(at_or_below as f64 / values.len() as f64 * 100.0)
}

fn historical_context(values: &[f64]) -> Option<HistoricalContext> {
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(HistoricalContext {
        mean: mean(values),
        std: sample_std(values),
        min,
        max,
    })
}

/// Fractional change from `from` to `to`; `None` when `from` is zero.
fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    let change = (to - from) / from;
    change.is_finite().then_some(change)
}

/// Period-over-period fractional changes, skipping undefined ones.
fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| pct_change(w[0], w[1]))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with an n-1 denominator.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};

    fn monthly(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        TimeSeries::from_values(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Months::new(i as u32), *v)),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_series_is_all_absent() {
        let summary = summarize(&TimeSeries::default(), true);
        assert_eq!(summary, IndicatorSummary::default());
        assert_eq!(summary.recent_direction, Direction::Stable);
    }

    #[test]
    fn test_single_point() {
        let summary = summarize(&monthly(&[42.0]), true);
        assert_eq!(summary.latest_value, Some(42.0));
        assert!(summary.recent_change.is_none());
        assert_eq!(summary.recent_direction, Direction::Stable);
        assert!(summary.year_over_year_change_pct.is_none());
        assert!(summary.volatility.is_none());
        assert_eq!(summary.historical_percentile, Some(100.0));
        assert!(summary.historical.unwrap().std.is_none());
    }

    #[test]
    fn test_two_points_up() {
        let summary = summarize(&monthly(&[100.0, 105.0]), true);
        assert_eq!(summary.recent_change, Some(5.0));
        assert_eq!(summary.recent_direction, Direction::Up);
        assert!(summary.year_over_year_change_pct.is_none());
        assert_eq!(
            summary.latest_timestamp,
            NaiveDate::from_ymd_opt(2020, 2, 1)
        );
    }

    #[test]
    fn test_down_direction_matches_sign() {
        let summary = summarize(&monthly(&[5.0, 4.0, 3.5]), false);
        assert_eq!(summary.recent_change, Some(-0.5));
        assert_eq!(summary.recent_direction, Direction::Down);
    }

    #[test]
    fn test_yoy_thirteen_points_compares_twelve_back() {
        let mut values = vec![100.0];
        values.extend((0..11).map(|i| 101.0 + i as f64));
        values.push(110.0);
        assert_eq!(values.len(), 13);

        let summary = summarize(&monthly(&values), true);
        assert!(approx(summary.year_over_year_change_pct.unwrap(), 10.0));
    }

    #[test]
    fn test_yoy_twelve_points_falls_back_to_first() {
        let mut values = vec![50.0; 11];
        values[0] = 80.0;
        values.push(100.0);

        let summary = summarize(&monthly(&values), true);
        assert!(approx(summary.year_over_year_change_pct.unwrap(), 25.0));
    }

    #[test]
    fn test_yoy_uses_lookback_not_first_when_longer() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let summary = summarize(&monthly(&values), true);
        // 20 vs 8 (index 7)
        assert!(approx(summary.year_over_year_change_pct.unwrap(), 150.0));
    }

    #[test]
    fn test_yoy_absent_when_not_requested_or_short() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        assert!(summarize(&monthly(&values), false)
            .year_over_year_change_pct
            .is_none());
        assert!(summarize(&monthly(&values[..11]), true)
            .year_over_year_change_pct
            .is_none());
    }

    #[test]
    fn test_yoy_zero_base_is_absent() {
        let mut values = vec![0.0];
        values.extend(std::iter::repeat(1.0).take(12));
        let summary = summarize(&monthly(&values), true);
        assert!(summary.year_over_year_change_pct.is_none());
    }

    #[test]
    fn test_constant_series_is_stable_with_zero_volatility() {
        let summary = summarize(&monthly(&[7.0; 15]), true);
        assert_eq!(summary.recent_direction, Direction::Stable);
        assert_eq!(summary.recent_change, Some(0.0));
        assert_eq!(summary.volatility, Some(0.0));
        assert_eq!(summary.year_over_year_change_pct, Some(0.0));
    }

    #[test]
    fn test_volatility_absent_below_ten_points() {
        let summary = summarize(&monthly(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]), false);
        assert!(summary.volatility.is_none());
    }

    #[test]
    fn test_volatility_uses_trailing_window() {
        // Large early swing must not affect the trailing ten changes.
        let mut values = vec![1.0, 1000.0];
        values.extend(std::iter::repeat(10.0).take(11));
        let summary = summarize(&monthly(&values), false);
        assert_eq!(summary.volatility, Some(0.0));
    }

    #[test]
    fn test_volatility_sample_std() {
        // Alternating +10% / -10%-ish moves around 100.
        let values = [100.0, 110.0, 100.0, 110.0, 100.0, 110.0, 100.0, 110.0, 100.0, 110.0, 100.0];
        let summary = summarize(&monthly(&values), false);

        let up = 0.1;
        let down = -1.0 / 11.0;
        let changes = [up, down, up, down, up, down, up, down, up, down];
        let m = changes.iter().sum::<f64>() / 10.0;
        let expected =
            (changes.iter().map(|c| (c - m).powi(2)).sum::<f64>() / 9.0).sqrt();

        assert!(approx(summary.volatility.unwrap(), expected));
        assert!(summary.volatility.unwrap() > 0.0);
    }

    #[test]
    fn test_volatility_skips_zero_denominators() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let summary = summarize(&monthly(&values), false);
        let vol = summary.volatility.unwrap();
        assert!(vol.is_finite());
        assert!(vol >= 0.0);
    }

    #[test]
    fn test_percentile_bounds() {
        let at_max = summarize(&monthly(&[1.0, 3.0, 2.0, 5.0]), false);
        assert_eq!(at_max.historical_percentile, Some(100.0));

        let at_min = summarize(&monthly(&[4.0, 3.0, 2.0, 1.0]), false);
        assert_eq!(at_min.historical_percentile, Some(25.0));

        let middle = summarize(&monthly(&[1.0, 5.0, 3.0, 2.0, 3.0]), false);
        assert_eq!(middle.historical_percentile, Some(80.0));
    }

    #[test]
    fn test_historical_context() {
        let summary = summarize(&monthly(&[2.0, 4.0, 6.0]), false);
        let ctx = summary.historical.unwrap();
        assert!(approx(ctx.mean, 4.0));
        assert!(approx(ctx.std.unwrap(), 2.0));
        assert_eq!(ctx.min, 2.0);
        assert_eq!(ctx.max, 6.0);
    }

    #[test]
    fn test_market_summary() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 2) as f64).collect();
        let summary = summarize_market(&monthly(&closes));

        assert_eq!(summary.latest_price, Some(100.0));
        assert!(approx(summary.price_change_pct.unwrap(), -100.0 / 101.0));
        assert_eq!(summary.direction, Direction::Down);
        assert!(summary.annualized_volatility.unwrap() > 0.0);
    }

    #[test]
    fn test_market_summary_short_series() {
        let summary = summarize_market(&monthly(&[10.0, 12.0]));
        assert!(approx(summary.price_change_pct.unwrap(), 20.0));
        assert_eq!(summary.direction, Direction::Up);
        assert!(summary.annualized_volatility.is_none());

        assert_eq!(summarize_market(&TimeSeries::default()), MarketSummary::default());
    }
}
