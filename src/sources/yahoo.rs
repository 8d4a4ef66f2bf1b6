//! Yahoo Finance chart client for daily closing prices.

use super::{get_text, SourceError};
use crate::models::{DataSource, Period, TimeSeries};
use chrono::DateTime;
use serde::Deserialize;

const PROVIDER: DataSource = DataSource::YahooFinance;

#[derive(Debug, Clone)]
pub struct YahooClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl YahooClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Daily closes of `symbol` over `period`.
    pub async fn daily_closes(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<TimeSeries, SourceError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let body = get_text(
            &self.http,
            PROVIDER,
            &url,
            &[("range", period.as_str()), ("interval", "1d")],
        )
        .await?;
        parse_chart(&body)
    }
}

/// Pair chart timestamps with closing prices; `null` closes are gaps.
pub fn parse_chart(body: &str) -> Result<TimeSeries, SourceError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    if let Some(error) = response.chart.error {
        return Err(SourceError::Provider {
            provider: PROVIDER,
            message: error
                .description
                .or(error.code)
                .unwrap_or_else(|| "unknown chart error".to_string()),
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::parse(PROVIDER, "empty chart result"))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != result.timestamp.len() {
        return Err(SourceError::parse(
            PROVIDER,
            format!(
                "{} timestamps but {} closes",
                result.timestamp.len(),
                closes.len()
            ),
        ));
    }

    let points = result
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            DateTime::from_timestamp(ts, 0).map(|dt| (dt.date_naive(), close))
        });

    Ok(TimeSeries::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const CHART: &str = include_str!("../../fixtures/yahoo_chart.json");

    #[test]
    fn test_parse_chart() {
        let series = parse_chart(CHART).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.dropped(), 1);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
        );
        assert_eq!(series.last().unwrap().value, 5827.04);
    }

    #[test]
    fn test_chart_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(body).unwrap_err();
        assert!(err.to_string().contains("symbol may be delisted"));
    }

    #[test]
    fn test_mismatched_lengths() {
        let body = r#"{"chart":{"result":[{"timestamp":[1736173800,1736260200],"indicators":{"quote":[{"close":[1.0]}]}}],"error":null}}"#;
        assert!(matches!(parse_chart(body), Err(SourceError::Parse { .. })));
    }
}
