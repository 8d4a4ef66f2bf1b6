//! FRED (Federal Reserve Economic Data) client.

use super::{get_text, parse_value, SourceError};
use crate::models::{DataSource, SeriesMetadata, TimeSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

const PROVIDER: DataSource = DataSource::Fred;

/// Client for the FRED series endpoints.
#[derive(Debug, Clone)]
pub struct FredClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    seriess: Vec<RawSeries>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    frequency: Option<String>,
    units: Option<String>,
    seasonal_adjustment: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: String,
}

impl FredClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Observations of `series_id` from `start` onwards.
    pub async fn observations(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<TimeSeries, SourceError> {
        let start = start.format("%Y-%m-%d").to_string();
        let url = format!("{}/series/observations", self.base_url);
        let body = get_text(
            &self.http,
            PROVIDER,
            &url,
            &self.query(&[("series_id", series_id), ("observation_start", &start)]),
        )
        .await?;

        let series = parse_observations(&body)?;
        debug!(
            "FRED {}: {} observations ({} missing)",
            series_id,
            series.len(),
            series.dropped()
        );
        Ok(series)
    }

    /// Descriptive metadata for `series_id`.
    pub async fn series_info(&self, series_id: &str) -> Result<SeriesMetadata, SourceError> {
        let url = format!("{}/series", self.base_url);
        let body = get_text(
            &self.http,
            PROVIDER,
            &url,
            &self.query(&[("series_id", series_id)]),
        )
        .await?;
        parse_series_info(&body)
    }

    fn query<'a>(&'a self, params: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut query = params.to_vec();
        query.push(("file_type", "json"));
        if let Some(ref key) = self.api_key {
            query.push(("api_key", key.as_str()));
        }
        query
    }
}

/// Parse a `series/observations` response. `"."` marks a missing value.
pub fn parse_observations(body: &str) -> Result<TimeSeries, SourceError> {
    check_error(body)?;
    let response: ObservationsResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    let points = response
        .observations
        .into_iter()
        .filter_map(|obs| match NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d") {
            Ok(date) => Some((date, parse_value(&obs.value))),
            Err(_) => {
                debug!("FRED: skipping observation with bad date {:?}", obs.date);
                None
            }
        });

    Ok(TimeSeries::from_points(points))
}

/// Parse a `series` response into metadata.
pub fn parse_series_info(body: &str) -> Result<SeriesMetadata, SourceError> {
    check_error(body)?;
    let response: SeriesResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    let series = response
        .seriess
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::parse(PROVIDER, "no series in response"))?;

    let defaults = SeriesMetadata::default();
    Ok(SeriesMetadata {
        frequency: series.frequency.unwrap_or(defaults.frequency),
        units: series.units.unwrap_or(defaults.units),
        seasonal_adjustment: series
            .seasonal_adjustment
            .unwrap_or(defaults.seasonal_adjustment),
        notes: series.notes.unwrap_or_default(),
    })
}

// FRED reports some failures in a 200 body
fn check_error(body: &str) -> Result<(), SourceError> {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => Err(SourceError::Provider {
            provider: PROVIDER,
            message: err.error_message,
        }),
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVATIONS: &str = include_str!("../../fixtures/fred_observations.json");
    const SERIES: &str = include_str!("../../fixtures/fred_series.json");

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_observations() {
        let series = parse_observations(OBSERVATIONS).unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.dropped(), 1);
        assert_eq!(series.first().unwrap().date, date(2024, 8, 1));
        // out-of-order input is sorted
        let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 8, 1),
                date(2024, 9, 1),
                date(2024, 11, 1),
                date(2024, 12, 1)
            ]
        );
        assert_eq!(series.last().unwrap().value, 4.1);
    }

    #[test]
    fn test_parse_series_info() {
        let metadata = parse_series_info(SERIES).unwrap();
        assert_eq!(metadata.frequency, "Monthly");
        assert_eq!(metadata.units, "Percent");
        assert_eq!(metadata.seasonal_adjustment, "Seasonally Adjusted");
        assert!(metadata.notes.starts_with("The unemployment rate"));
    }

    #[test]
    fn test_provider_error_body() {
        let body = r#"{"error_code":400,"error_message":"Bad Request. The series does not exist."}"#;
        let err = parse_observations(body).unwrap_err();
        assert!(matches!(err, SourceError::Provider { .. }));
        assert!(err.to_string().contains("series does not exist"));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_observations("<html>"),
            Err(SourceError::Parse { .. })
        ));
        assert!(parse_series_info(r#"{"seriess": []}"#).is_err());
    }

    #[test]
    fn test_query_includes_key_only_when_present() {
        let http = reqwest::Client::new();
        let anonymous = FredClient::new(http.clone(), "https://example.test/fred/", None);
        assert_eq!(anonymous.base_url, "https://example.test/fred");
        let query = anonymous.query(&[("series_id", "GDP")]);
        assert!(!query.iter().any(|(k, _)| *k == "api_key"));

        let keyed = FredClient::new(http, "https://example.test/fred", Some("k".into()));
        let query = keyed.query(&[("series_id", "GDP")]);
        assert!(query.contains(&("api_key", "k")));
        assert!(query.contains(&("file_type", "json")));
    }
}
