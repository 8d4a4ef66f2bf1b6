//! Alpha Vantage economic indicators client.

use super::{get_text, parse_value, SourceError};
use crate::models::{DataSource, SeriesMetadata, TimeSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

const PROVIDER: DataSource = DataSource::AlphaVantage;

/// Client for Alpha Vantage's economic indicator functions.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A parsed economic indicator response.
#[derive(Debug, Clone)]
pub struct AlphaVantageSeries {
    pub name: Option<String>,
    pub metadata: SeriesMetadata,
    pub series: TimeSeries,
}

#[derive(Debug, Deserialize)]
struct IndicatorResponse {
    name: Option<String>,
    interval: Option<String>,
    unit: Option<String>,
    #[serde(default)]
    data: Vec<RawPoint>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    date: String,
    value: String,
}

impl AlphaVantageClient {
    /// Fails with [`SourceError::MissingApiKey`] when no key is configured.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, SourceError> {
        let api_key = api_key.ok_or(SourceError::MissingApiKey { provider: PROVIDER })?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            api_key,
        })
    }

    /// Fetch one economic function such as `CPI` or `REAL_GDP`.
    pub async fn indicator(&self, function: &str) -> Result<AlphaVantageSeries, SourceError> {
        let body = get_text(
            &self.http,
            PROVIDER,
            &self.base_url,
            &[
                ("function", function),
                ("apikey", self.api_key.as_str()),
                ("datatype", "json"),
            ],
        )
        .await?;
        parse_indicator(&body)
    }
}

/// Parse an economic indicator response.
///
/// Alpha Vantage answers rate limits and bad requests with HTTP 200 and a
/// single `Information`, `Note` or `Error Message` field.
pub fn parse_indicator(body: &str) -> Result<AlphaVantageSeries, SourceError> {
    if let Ok(fields) = serde_json::from_str::<HashMap<String, serde_json::Value>>(body) {
        for key in ["Error Message", "Information", "Note"] {
            if let Some(message) = fields.get(key).and_then(|v| v.as_str()) {
                return Err(SourceError::Provider {
                    provider: PROVIDER,
                    message: message.to_string(),
                });
            }
        }
    }

    let response: IndicatorResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    let points = response.data.into_iter().filter_map(|point| {
        NaiveDate::parse_from_str(&point.date, "%Y-%m-%d")
            .ok()
            .map(|date| (date, parse_value(&point.value)))
    });

    let defaults = SeriesMetadata::default();
    Ok(AlphaVantageSeries {
        name: response.name,
        metadata: SeriesMetadata {
            frequency: response.interval.unwrap_or(defaults.frequency),
            units: response.unit.unwrap_or(defaults.units),
            ..defaults
        },
        series: TimeSeries::from_points(points),
    })
}
