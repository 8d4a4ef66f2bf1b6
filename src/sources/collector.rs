//! Assembles an [`EconomicData`] snapshot from all providers.

use super::alpha_vantage::AlphaVantageClient;
use super::catalog::{
    self, ALPHA_VANTAGE_FUNCTIONS, INTERNATIONAL_SERIES, MARKET_SYMBOLS, REGIONAL_SERIES,
};
use super::fred::FredClient;
use super::throttle::Pacer;
use super::yahoo::YahooClient;
use super::SourceError;
use crate::analysis::{data_quality_report, summary_statistics};
use crate::config::{Credentials, SourcesConfig};
use crate::models::{
    AnalysisType, DataSource, EconomicData, FetchFailure, Indicator, IndicatorCategory, Period,
    SeriesMetadata, TimeSeries,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What to collect.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub analysis_type: AnalysisType,
    pub period: Period,
    pub include_regional: bool,
    pub include_international: bool,
    pub include_market: bool,
    pub show_progress: bool,
}

/// Where a FRED series lands in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Core,
    Regional,
    International,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FredJob {
    id: &'static str,
    fred_id: &'static str,
    name: String,
    category: IndicatorCategory,
    group: Group,
}

/// Fetches series from FRED, Alpha Vantage and Yahoo Finance.
pub struct Collector {
    fred: FredClient,
    alpha_vantage: Option<AlphaVantageClient>,
    yahoo: YahooClient,
    fred_pacer: Pacer,
    alpha_vantage_pacer: Pacer,
    yahoo_pacer: Pacer,
    concurrency: usize,
}

impl Collector {
    pub fn new(
        sources: &SourcesConfig,
        credentials: &Credentials,
        concurrency: usize,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(sources.request_timeout_seconds))
            .user_agent(concat!("econsight/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        if credentials.fred_api_key.is_none() {
            warn!("FRED_API_KEY not set; FRED requests may be rejected");
        }

        let alpha_vantage = match AlphaVantageClient::new(
            http.clone(),
            &sources.alpha_vantage_url,
            credentials.alpha_vantage_api_key.clone(),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Skipping Alpha Vantage: {}", e);
                None
            }
        };

        Ok(Self {
            fred: FredClient::new(
                http.clone(),
                &sources.fred_url,
                credentials.fred_api_key.clone(),
            ),
            alpha_vantage,
            yahoo: YahooClient::new(http, &sources.yahoo_url),
            fred_pacer: Pacer::new(Duration::from_millis(sources.fred_delay_ms)),
            alpha_vantage_pacer: Pacer::new(Duration::from_millis(sources.alpha_vantage_delay_ms)),
            yahoo_pacer: Pacer::new(Duration::from_millis(sources.yahoo_delay_ms)),
            concurrency: concurrency.max(1),
        })
    }

    /// Collect every series for `request`.
    ///
    /// A failed series never aborts collection; it is logged and recorded
    /// in [`EconomicData::failures`].
    pub async fn collect(&self, request: &CollectRequest) -> EconomicData {
        let today = Utc::now().date_naive();
        let start = request.period.start_date(today);

        let jobs = fred_jobs(request);
        let alpha_count = if self.alpha_vantage.is_some() {
            ALPHA_VANTAGE_FUNCTIONS.len()
        } else {
            0
        };
        let market_count = if request.include_market {
            MARKET_SYMBOLS.len()
        } else {
            0
        };

        let progress = progress_bar(
            request.show_progress,
            (jobs.len() + alpha_count + market_count) as u64,
        );

        info!(
            "Collecting {} analysis data for the last {} (since {})",
            request.analysis_type, request.period, start
        );

        let mut indicators = BTreeMap::new();
        let mut regional = BTreeMap::new();
        let mut international = BTreeMap::new();
        let mut core_failures = Vec::new();
        let mut other_failures = Vec::new();

        for job in &jobs {
            progress.set_message(job.id);

            match self.fetch_fred(job, start).await {
                Ok(indicator) => {
                    debug!("{}: {} observations", job.id, indicator.series.len());
                    let target = match job.group {
                        Group::Core => &mut indicators,
                        Group::Regional => &mut regional,
                        Group::International => &mut international,
                    };
                    target.insert(job.id.to_string(), indicator);
                }
                Err(e) => {
                    warn!("Failed to fetch {} ({}): {}", job.id, job.fred_id, e);
                    let failure = FetchFailure {
                        id: job.id.to_string(),
                        source: DataSource::Fred,
                        error: e.to_string(),
                    };
                    if job.group == Group::Core {
                        core_failures.push(failure);
                    } else {
                        other_failures.push(failure);
                    }
                }
            }
            progress.inc(1);
        }

        if let Some(ref client) = self.alpha_vantage {
            for (id, function) in ALPHA_VANTAGE_FUNCTIONS {
                progress.set_message(*id);

                self.alpha_vantage_pacer.until_ready().await;
                match client.indicator(function).await {
                    Ok(parsed) => {
                        indicators.insert(
                            id.to_string(),
                            Indicator {
                                id: id.to_string(),
                                name: parsed.name.unwrap_or_else(|| catalog::title_case(id)),
                                category: IndicatorCategory::AlphaVantage,
                                source: DataSource::AlphaVantage,
                                metadata: parsed.metadata,
                                series: parsed.series,
                            },
                        );
                    }
                    Err(e) => {
                        warn!("Failed to fetch Alpha Vantage {}: {}", function, e);
                        core_failures.push(FetchFailure {
                            id: id.to_string(),
                            source: DataSource::AlphaVantage,
                            error: e.to_string(),
                        });
                    }
                }
                progress.inc(1);
            }
        }

        let mut market = BTreeMap::new();
        if request.include_market {
            let results = stream::iter(MARKET_SYMBOLS.iter())
                .map(|(name, symbol)| {
                    let progress = progress.clone();
                    async move {
                        self.yahoo_pacer.until_ready().await;
                        let result = self.yahoo.daily_closes(symbol, request.period).await;
                        progress.inc(1);
                        (*name, *symbol, result)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect::<Vec<_>>()
                .await;

            for (name, symbol, result) in results {
                match result {
                    Ok(series) if !series.is_empty() => {
                        market.insert(name.to_string(), series);
                    }
                    Ok(_) => other_failures.push(FetchFailure {
                        id: name.to_string(),
                        source: DataSource::YahooFinance,
                        error: "no closing prices returned".to_string(),
                    }),
                    Err(e) => {
                        warn!("Failed to fetch {} ({}): {}", name, symbol, e);
                        other_failures.push(FetchFailure {
                            id: name.to_string(),
                            source: DataSource::YahooFinance,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        progress.finish_and_clear();

        let summary = summary_statistics(&indicators);
        let quality = data_quality_report(&indicators, &core_failures, today);

        let mut failures = core_failures;
        failures.extend(other_failures);

        info!(
            "Collected {} indicators, {} regional, {} international, {} market series ({} failures)",
            indicators.len(),
            regional.len(),
            international.len(),
            market.len(),
            failures.len()
        );

        EconomicData {
            analysis_type: request.analysis_type,
            period: request.period,
            collected_at: Utc::now(),
            indicators,
            regional,
            international,
            market,
            failures,
            summary,
            quality,
        }
    }

    async fn fetch_fred(&self, job: &FredJob, start: NaiveDate) -> Result<Indicator, SourceError> {
        self.fred_pacer.until_ready().await;
        let series: TimeSeries = self.fred.observations(job.fred_id, start).await?;

        self.fred_pacer.until_ready().await;
        let metadata = match self.fred.series_info(job.fred_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("No metadata for {}: {}", job.fred_id, e);
                SeriesMetadata::default()
            }
        };

        Ok(Indicator {
            id: job.id.to_string(),
            name: job.name.clone(),
            category: job.category,
            source: DataSource::Fred,
            metadata,
            series,
        })
    }
}

/// FRED series to fetch for a request, in fetch order.
fn fred_jobs(request: &CollectRequest) -> Vec<FredJob> {
    let mut jobs: Vec<FredJob> = catalog::indicators_for(request.analysis_type)
        .into_iter()
        .map(|indicator| FredJob {
            id: indicator.key,
            fred_id: indicator.fred_id,
            name: indicator.name.to_string(),
            category: indicator.category,
            group: Group::Core,
        })
        .collect();

    let extra = [
        (
            request.include_regional,
            REGIONAL_SERIES,
            IndicatorCategory::Regional,
            Group::Regional,
        ),
        (
            request.include_international,
            INTERNATIONAL_SERIES,
            IndicatorCategory::International,
            Group::International,
        ),
    ];

    for (enabled, table, category, group) in extra {
        if !enabled {
            continue;
        }
        jobs.extend(table.iter().map(|&(id, fred_id)| FredJob {
            id,
            fred_id,
            name: catalog::title_case(id),
            category,
            group,
        }));
    }

    jobs
}

fn progress_bar(show: bool, len: u64) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
