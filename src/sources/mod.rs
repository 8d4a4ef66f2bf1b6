//! Economic and market data providers.
//!
//! Thin HTTP clients for FRED, Alpha Vantage and Yahoo Finance, the
//! indicator catalog, and the collector that assembles an
//! [`EconomicData`](crate::models::EconomicData) snapshot.

pub mod alpha_vantage;
pub mod catalog;
pub mod collector;
pub mod fred;
pub mod throttle;
pub mod yahoo;

pub use collector::{CollectRequest, Collector};

use crate::models::DataSource;
use thiserror::Error;
use tracing::debug;

/// Failure talking to a data provider.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {provider} failed: {message}")]
    Transport {
        provider: DataSource,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: DataSource,
        status: u16,
        body: String,
    },

    #[error("failed to parse {provider} response: {message}")]
    Parse {
        provider: DataSource,
        message: String,
    },

    #[error("{provider} reported an error: {message}")]
    Provider {
        provider: DataSource,
        message: String,
    },

    #[error("{provider} API key not configured")]
    MissingApiKey { provider: DataSource },
}

impl SourceError {
    pub(crate) fn parse(provider: DataSource, err: impl std::fmt::Display) -> Self {
        SourceError::Parse {
            provider,
            message: err.to_string(),
        }
    }
}

/// Issue a GET request and return the body of a successful response.
pub(crate) async fn get_text(
    http: &reqwest::Client,
    provider: DataSource,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, SourceError> {
    debug!("GET {} ({} params)", url, query.len());

    let response = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| SourceError::Transport {
            provider,
            message: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.without_url().to_string()
            },
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| SourceError::Transport {
        provider,
        message: e.without_url().to_string(),
    })?;

    if !status.is_success() {
        return Err(SourceError::Status {
            provider,
            status: status.as_u16(),
            body: truncate(&body, 200),
        });
    }

    Ok(body)
}

/// Cut `text` to at most `max` characters.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Parse a provider's numeric string, treating placeholders as missing.
pub(crate) fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_placeholders() {
        assert_eq!(parse_value("3.7"), Some(3.7));
        assert_eq!(parse_value(" -0.25 "), Some(-0.25));
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_error_messages() {
        let err = SourceError::Status {
            provider: DataSource::Fred,
            status: 429,
            body: "Too Many Requests".to_string(),
        };
        assert_eq!(err.to_string(), "FRED returned HTTP 429: Too Many Requests");
    }
}
