//! Data models for the economic analysis pipeline.
//!
//! This module contains the core data structures shared across the
//! application: time series, per-indicator summaries, collected data
//! snapshots, and the final report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// An ordered, gap-free time series.
///
/// Observations are strictly increasing by date. Missing or non-finite
/// values are dropped at construction and only counted; a later duplicate
/// date replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTimeSeries")]
pub struct TimeSeries {
    observations: Vec<Observation>,
    dropped: usize,
}

/// Serialized form of a [`TimeSeries`], re-validated on load.
#[derive(Deserialize)]
struct RawTimeSeries {
    observations: Vec<Observation>,
    #[serde(default)]
    dropped: usize,
}

impl From<RawTimeSeries> for TimeSeries {
    fn from(raw: RawTimeSeries) -> Self {
        let mut series = Self::from_points(
            raw.observations
                .into_iter()
                .map(|o| (o.date, Some(o.value))),
        );
        series.dropped += raw.dropped;
        series
    }
}

impl TimeSeries {
    /// Builds a series from raw `(date, value)` pairs in any order.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut dropped = 0;
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for (date, value) in points {
            match value.filter(|v| v.is_finite()) {
                Some(v) => {
                    by_date.insert(date, v);
                }
                None => dropped += 1,
            }
        }

        let observations = by_date
            .into_iter()
            .map(|(date, value)| Observation { date, value })
            .collect();

        Self {
            observations,
            dropped,
        }
    }

    /// Builds a series from already-present values.
    #[cfg(test)]
    pub fn from_values<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::from_points(points.into_iter().map(|(d, v)| (d, Some(v))))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// All retained observations, oldest first.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterator over the retained values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.value)
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Number of raw observations dropped as gaps.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Direction of the most recent move in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Stable,
}

impl Direction {
    /// Classifies a change by its sign. Absent changes are stable.
    pub fn from_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 0.0 => Direction::Up,
            Some(c) if c < 0.0 => Direction::Down,
            _ => Direction::Stable,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Stable => "■",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Stable => write!(f, "stable"),
        }
    }
}

/// Descriptive statistics over a full series history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalContext {
    pub mean: f64,
    /// Sample standard deviation; absent for a single observation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Derived, immutable summary of one indicator series.
///
/// Absent fields mean "not computable from the available data" and are
/// omitted when serialized into prompts and reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_timestamp: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_change: Option<f64>,
    pub recent_direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_over_year_change_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_percentile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical: Option<HistoricalContext>,
}

/// Summary of a daily market price series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_pct: Option<f64>,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annualized_volatility: Option<f64>,
}

/// Economic category of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    Growth,
    Inflation,
    Employment,
    Monetary,
    Sentiment,
    Housing,
    Industrial,
    Trade,
    Regional,
    International,
    AlphaVantage,
}

impl fmt::Display for IndicatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorCategory::Growth => "growth",
            IndicatorCategory::Inflation => "inflation",
            IndicatorCategory::Employment => "employment",
            IndicatorCategory::Monetary => "monetary",
            IndicatorCategory::Sentiment => "sentiment",
            IndicatorCategory::Housing => "housing",
            IndicatorCategory::Industrial => "industrial",
            IndicatorCategory::Trade => "trade",
            IndicatorCategory::Regional => "regional",
            IndicatorCategory::International => "international",
            IndicatorCategory::AlphaVantage => "alpha_vantage",
        };
        write!(f, "{}", name)
    }
}

/// Upstream data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    #[serde(rename = "FRED")]
    Fred,
    #[serde(rename = "Alpha Vantage")]
    AlphaVantage,
    #[serde(rename = "Yahoo Finance")]
    YahooFinance,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Fred => write!(f, "FRED"),
            DataSource::AlphaVantage => write!(f, "Alpha Vantage"),
            DataSource::YahooFinance => write!(f, "Yahoo Finance"),
        }
    }
}

/// Descriptive metadata reported by the provider for a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub frequency: String,
    pub units: String,
    pub seasonal_adjustment: String,
    #[serde(default)]
    pub notes: String,
}

impl Default for SeriesMetadata {
    fn default() -> Self {
        Self {
            frequency: "Unknown".to_string(),
            units: "Unknown".to_string(),
            seasonal_adjustment: "Unknown".to_string(),
            notes: String::new(),
        }
    }
}

/// A named economic time series with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub name: String,
    pub category: IndicatorCategory,
    pub source: DataSource,
    pub metadata: SeriesMetadata,
    pub series: TimeSeries,
}

/// Provenance of one collected series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub name: String,
    pub source: DataSource,
    /// FRED series id, Alpha Vantage function or ticker symbol.
    pub provider_id: String,
    pub metadata: SeriesMetadata,
}

/// A series that could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub id: String,
    pub source: DataSource,
    pub error: String,
}

/// Kind of analysis requested by the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    #[default]
    #[value(name = "comprehensive")]
    Comprehensive,
    #[value(name = "gdp_focus")]
    GdpFocus,
    #[value(name = "inflation_focus")]
    InflationFocus,
    #[value(name = "employment_focus")]
    EmploymentFocus,
    #[value(name = "monetary_policy")]
    MonetaryPolicy,
    #[value(name = "market_trend")]
    MarketTrend,
    #[value(name = "industry_performance")]
    IndustryPerformance,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => "comprehensive",
            AnalysisType::GdpFocus => "gdp_focus",
            AnalysisType::InflationFocus => "inflation_focus",
            AnalysisType::EmploymentFocus => "employment_focus",
            AnalysisType::MonetaryPolicy => "monetary_policy",
            AnalysisType::MarketTrend => "market_trend",
            AnalysisType::IndustryPerformance => "industry_performance",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lookback window for fetched data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Period {
    #[serde(rename = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    #[value(name = "2y")]
    TwoYears,
    #[default]
    #[serde(rename = "5y")]
    #[value(name = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    #[value(name = "10y")]
    TenYears,
    #[serde(rename = "20y")]
    #[value(name = "20y")]
    TwentyYears,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::TwentyYears => "20y",
        }
    }

    /// Length of the window in days (365 per year).
    pub fn days(&self) -> i64 {
        let years = match self {
            Period::OneYear => 1,
            Period::TwoYears => 2,
            Period::FiveYears => 5,
            Period::TenYears => 10,
            Period::TwentyYears => 20,
        };
        years * 365
    }

    /// First date of the window ending at `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        today - chrono::Duration::days(self.days())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First and last dates of a series plus its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub observations: usize,
}

/// Most recent observation of an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestValue {
    pub value: f64,
    pub date: NaiveDate,
}

/// Last-period movement of an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub recent_change: f64,
    pub percent_change: f64,
    pub direction: Direction,
}

/// Cross-indicator statistics for a collected snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_indicators: usize,
    pub categories: BTreeMap<String, Vec<String>>,
    pub data_ranges: BTreeMap<String, DataRange>,
    pub latest_values: BTreeMap<String, LatestValue>,
    pub trends: BTreeMap<String, Trend>,
}

/// Share of raw observations that carried a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completeness {
    pub completeness_pct: f64,
    pub missing_values: usize,
    pub total_observations: usize,
}

/// Age bucket of the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    Fresh,
    Stale,
    VeryStale,
}

impl FreshnessStatus {
    pub fn from_days_old(days_old: i64) -> Self {
        if days_old <= 7 {
            FreshnessStatus::Fresh
        } else if days_old <= 30 {
            FreshnessStatus::Stale
        } else {
            FreshnessStatus::VeryStale
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessStatus::Fresh => write!(f, "fresh"),
            FreshnessStatus::Stale => write!(f, "stale"),
            FreshnessStatus::VeryStale => write!(f, "very stale"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freshness {
    pub latest_date: NaiveDate,
    pub days_old: i64,
    pub status: FreshnessStatus,
}

/// Data quality findings for a collected snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub total_indicators: usize,
    pub successful_fetches: usize,
    pub failed_fetches: usize,
    pub completeness: BTreeMap<String, Completeness>,
    pub freshness: BTreeMap<String, Freshness>,
    pub sources: BTreeMap<String, usize>,
    pub issues: Vec<String>,
}

/// Everything collected for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicData {
    pub analysis_type: AnalysisType,
    pub period: Period,
    pub collected_at: DateTime<Utc>,
    pub indicators: BTreeMap<String, Indicator>,
    pub regional: BTreeMap<String, Indicator>,
    pub international: BTreeMap<String, Indicator>,
    /// Daily closing prices keyed by market name.
    pub market: BTreeMap<String, TimeSeries>,
    pub failures: Vec<FetchFailure>,
    pub summary: SummaryStatistics,
    pub quality: DataQualityReport,
}

impl EconomicData {
    /// Look up an indicator in the core, regional and international maps.
    pub fn indicator(&self, id: &str) -> Option<&Indicator> {
        self.indicators
            .get(id)
            .or_else(|| self.regional.get(id))
            .or_else(|| self.international.get(id))
    }
}

/// Thematic analysis step of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Growth,
    Inflation,
    Employment,
    Monetary,
    Sentiment,
    Industry,
}

impl Domain {
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Growth => "Economic Growth",
            Domain::Inflation => "Inflation",
            Domain::Employment => "Employment",
            Domain::Monetary => "Monetary Policy",
            Domain::Sentiment => "Market Sentiment",
            Domain::Industry => "Industry Performance",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Result of one domain analysis step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub domain: Domain,
    pub indicators: BTreeMap<String, IndicatorSummary>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub market: BTreeMap<String, MarketSummary>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub risk: BTreeMap<String, MarketSummary>,
    pub assessment: String,
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub analysis_type: AnalysisType,
    pub period: Period,
    pub analysis_date: DateTime<Utc>,
    pub model_used: String,
    pub indicators_analyzed: usize,
    pub fetch_failures: usize,
    pub duration_seconds: f64,
}

/// The complete economic analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Per-indicator summaries of every collected core indicator.
    pub data_summary: BTreeMap<String, IndicatorSummary>,
    /// Name, provider and metadata of every collected series.
    pub series: BTreeMap<String, SeriesInfo>,
    pub statistics: SummaryStatistics,
    pub data_quality: DataQualityReport,
    pub executive_summary: String,
    pub analyses: Vec<DomainAnalysis>,
    pub insights: String,
    pub policy_implications: String,
    pub economic_outlook: String,
    pub risk_assessment: String,
    pub recommendations: Vec<String>,
    pub errors: Vec<String>,
}
