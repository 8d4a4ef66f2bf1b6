//! Catalog of fetched series.
//!
//! Static tables of FRED series, Alpha Vantage functions and market
//! symbols, plus the selection of indicators per analysis type and
//! per workflow domain.

use crate::models::{
    AnalysisType, DataSource, Domain, EconomicData, IndicatorCategory, SeriesInfo, SeriesMetadata,
};
use std::collections::BTreeMap;

/// A FRED series the application knows how to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FredIndicator {
    pub key: &'static str,
    pub fred_id: &'static str,
    pub name: &'static str,
    pub category: IndicatorCategory,
}

const fn fred(
    key: &'static str,
    fred_id: &'static str,
    name: &'static str,
    category: IndicatorCategory,
) -> FredIndicator {
    FredIndicator {
        key,
        fred_id,
        name,
        category,
    }
}

use IndicatorCategory as C;

/// Headline U.S. macro indicators.
pub const CORE_INDICATORS: &[FredIndicator] = &[
    fred("gdp", "GDP", "Gross Domestic Product", C::Growth),
    fred("gdp_real", "GDPC1", "Real Gross Domestic Product", C::Growth),
    fred("gdp_growth", "A191RL1Q225SBEA", "Real GDP Growth Rate", C::Growth),
    fred("cpi", "CPIAUCSL", "Consumer Price Index", C::Inflation),
    fred("core_cpi", "CPILFESL", "Core Consumer Price Index", C::Inflation),
    fred("pce", "PCEPI", "Personal Consumption Expenditures Price Index", C::Inflation),
    fred(
        "core_pce",
        "PCEPILFE",
        "Core Personal Consumption Expenditures Price Index",
        C::Inflation,
    ),
    fred("unemployment", "UNRATE", "Unemployment Rate", C::Employment),
    fred("nonfarm_payrolls", "PAYEMS", "Total Nonfarm Payrolls", C::Employment),
    fred(
        "labor_force_participation",
        "CIVPART",
        "Labor Force Participation Rate",
        C::Employment,
    ),
    fred("jobless_claims", "ICSA", "Initial Jobless Claims", C::Employment),
    fred("fed_rate", "FEDFUNDS", "Federal Funds Rate", C::Monetary),
    fred(
        "10y_treasury",
        "GS10",
        "10-Year Treasury Constant Maturity Rate",
        C::Monetary,
    ),
    fred(
        "2y_treasury",
        "GS2",
        "2-Year Treasury Constant Maturity Rate",
        C::Monetary,
    ),
    fred(
        "yield_curve",
        "T10Y2Y",
        "10-Year Treasury Constant Maturity Minus 2-Year Treasury",
        C::Monetary,
    ),
    fred(
        "consumer_confidence",
        "CSCICP03USM665S",
        "Consumer Confidence Index",
        C::Sentiment,
    ),
    fred(
        "consumer_sentiment",
        "UMCSENT",
        "University of Michigan Consumer Sentiment",
        C::Sentiment,
    ),
    fred("housing_starts", "HOUST", "Housing Starts", C::Housing),
    fred("home_sales", "EXHOSLUSM495S", "Existing Home Sales", C::Housing),
    fred(
        "industrial_production",
        "INDPRO",
        "Industrial Production Index",
        C::Industrial,
    ),
    fred("capacity_utilization", "TCU", "Capacity Utilization", C::Industrial),
    fred(
        "trade_balance",
        "BOPGSTB",
        "Trade Balance: Goods and Services",
        C::Trade,
    ),
];

/// Sector series used by the industry analysis.
pub const INDUSTRY_INDICATORS: &[FredIndicator] = &[
    fred(
        "tech_employment",
        "CES5051200001",
        "Software Publishers Employment",
        C::Industrial,
    ),
    fred(
        "healthcare_employment",
        "CES6562000001",
        "Health Care Employment",
        C::Industrial,
    ),
    fred(
        "energy_employment",
        "CES1021100001",
        "Oil and Gas Extraction Employment",
        C::Industrial,
    ),
    fred(
        "oil_price",
        "DCOILWTICO",
        "Crude Oil Prices: West Texas Intermediate",
        C::Industrial,
    ),
    fred(
        "natural_gas",
        "DHHNGSP",
        "Henry Hub Natural Gas Spot Price",
        C::Industrial,
    ),
];

/// Alpha Vantage economic functions, keyed by indicator id.
pub const ALPHA_VANTAGE_FUNCTIONS: &[(&str, &str)] = &[
    ("real_gdp", "REAL_GDP"),
    ("cpi_monthly", "CPI"),
    ("inflation", "INFLATION"),
    ("retail_sales", "RETAIL_SALES"),
    ("durables", "DURABLES"),
    ("unemployment_rate", "UNEMPLOYMENT"),
    ("nonfarm_payroll", "NONFARM_PAYROLL"),
];

/// State unemployment rates.
pub const REGIONAL_SERIES: &[(&str, &str)] = &[
    ("california_unemployment", "CAUR"),
    ("texas_unemployment", "TXUR"),
    ("new_york_unemployment", "NYUR"),
    ("florida_unemployment", "FLUR"),
];

/// Foreign GDP series.
pub const INTERNATIONAL_SERIES: &[(&str, &str)] = &[
    ("canada_gdp", "CANGDPNQDSMEI"),
    ("uk_gdp", "GBRRGDPQDSNAQ"),
    ("germany_gdp", "DEUQ"),
    ("japan_gdp", "JPNRGDPQDSNAQ"),
    ("china_gdp", "CHNGDPNQDSMEI"),
];

/// Yahoo Finance symbols, keyed by market name.
pub const MARKET_SYMBOLS: &[(&str, &str)] = &[
    ("sp500", "^GSPC"),
    ("nasdaq", "^IXIC"),
    ("dow", "^DJI"),
    ("vix", "^VIX"),
    ("dxy", "DX-Y.NYB"),
    ("gold", "GC=F"),
    ("oil", "CL=F"),
    ("treasury_etf", "TLT"),
    ("tips", "SCHP"),
];

/// Market name treated as the risk gauge in sentiment analysis.
pub const RISK_MARKET: &str = "vix";

/// Look up a FRED indicator by key in both tables.
pub fn find(key: &str) -> Option<&'static FredIndicator> {
    CORE_INDICATORS
        .iter()
        .chain(INDUSTRY_INDICATORS)
        .find(|i| i.key == key)
}

/// FRED indicators to fetch for an analysis type.
pub fn indicators_for(analysis_type: AnalysisType) -> Vec<&'static FredIndicator> {
    let keys: &[&str] = match analysis_type {
        AnalysisType::Comprehensive => return CORE_INDICATORS.iter().collect(),
        AnalysisType::GdpFocus => &[
            "gdp",
            "gdp_real",
            "gdp_growth",
            "industrial_production",
            "capacity_utilization",
        ],
        AnalysisType::InflationFocus => &["cpi", "core_cpi", "pce", "core_pce", "fed_rate"],
        AnalysisType::EmploymentFocus => domain_indicators(Domain::Employment),
        AnalysisType::MonetaryPolicy => domain_indicators(Domain::Monetary),
        AnalysisType::MarketTrend => &[
            "10y_treasury",
            "consumer_confidence",
            "consumer_sentiment",
        ],
        AnalysisType::IndustryPerformance => &[
            "industrial_production",
            "capacity_utilization",
            "tech_employment",
            "healthcare_employment",
            "energy_employment",
            "oil_price",
            "natural_gas",
        ],
    };

    keys.iter().filter_map(|k| find(k)).collect()
}

/// Indicator ids examined by a workflow domain.
pub fn domain_indicators(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Growth => &["gdp", "gdp_real", "gdp_growth", "industrial_production"],
        Domain::Inflation => &["cpi", "core_cpi", "pce", "core_pce"],
        Domain::Employment => &[
            "unemployment",
            "nonfarm_payrolls",
            "labor_force_participation",
            "jobless_claims",
        ],
        Domain::Monetary => &["fed_rate", "10y_treasury", "2y_treasury", "yield_curve"],
        Domain::Sentiment => &["consumer_confidence", "consumer_sentiment"],
        Domain::Industry => &[
            "industrial_production",
            "capacity_utilization",
            "tech_employment",
            "healthcare_employment",
            "energy_employment",
            "oil_price",
            "natural_gas",
            "retail_sales",
        ],
    }
}

/// The provider's own identifier for a catalog key.
pub fn provider_id(key: &str) -> Option<&'static str> {
    if let Some(indicator) = find(key) {
        return Some(indicator.fred_id);
    }

    ALPHA_VANTAGE_FUNCTIONS
        .iter()
        .chain(REGIONAL_SERIES)
        .chain(INTERNATIONAL_SERIES)
        .chain(MARKET_SYMBOLS)
        .find(|(k, _)| *k == key)
        .map(|(_, id)| *id)
}

/// Describe every series present in `data`.
pub fn describe(data: &EconomicData) -> BTreeMap<String, SeriesInfo> {
    let mut series: BTreeMap<String, SeriesInfo> = data
        .indicators
        .iter()
        .chain(&data.regional)
        .chain(&data.international)
        .map(|(id, indicator)| {
            (
                id.clone(),
                SeriesInfo {
                    name: indicator.name.clone(),
                    source: indicator.source,
                    provider_id: provider_id(id).unwrap_or(id.as_str()).to_string(),
                    metadata: indicator.metadata.clone(),
                },
            )
        })
        .collect();

    for id in data.market.keys() {
        series.insert(
            id.clone(),
            SeriesInfo {
                name: title_case(id),
                source: DataSource::YahooFinance,
                provider_id: provider_id(id).unwrap_or(id.as_str()).to_string(),
                metadata: SeriesMetadata {
                    frequency: "Daily".to_string(),
                    units: "Closing price".to_string(),
                    seasonal_adjustment: "Not Seasonally Adjusted".to_string(),
                    notes: String::new(),
                },
            },
        );
    }

    series
}

/// Turn a snake_case key into a display name.
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let mut seen = HashSet::new();
        for indicator in CORE_INDICATORS.iter().chain(INDUSTRY_INDICATORS) {
            assert!(seen.insert(indicator.key), "duplicate key {}", indicator.key);
        }
    }

    #[test]
    fn test_comprehensive_uses_all_core() {
        assert_eq!(
            indicators_for(AnalysisType::Comprehensive).len(),
            CORE_INDICATORS.len()
        );
    }

    #[test]
    fn test_focused_selection() {
        let keys: Vec<_> = indicators_for(AnalysisType::InflationFocus)
            .iter()
            .map(|i| i.key)
            .collect();
        assert_eq!(keys, vec!["cpi", "core_cpi", "pce", "core_pce", "fed_rate"]);

        let industry = indicators_for(AnalysisType::IndustryPerformance);
        assert!(industry.iter().any(|i| i.fred_id == "DCOILWTICO"));
    }

    #[test]
    fn test_domain_indicators_resolve() {
        for domain in [
            Domain::Growth,
            Domain::Inflation,
            Domain::Employment,
            Domain::Monetary,
            Domain::Sentiment,
        ] {
            for key in domain_indicators(domain) {
                assert!(find(key).is_some(), "unknown key {}", key);
            }
        }
    }

    #[test]
    fn test_provider_id_covers_every_table() {
        assert_eq!(provider_id("cpi"), Some("CPIAUCSL"));
        assert_eq!(provider_id("oil_price"), Some("DCOILWTICO"));
        assert_eq!(provider_id("california_unemployment"), Some("CAUR"));
        assert_eq!(provider_id("sp500"), Some("^GSPC"));
        assert_eq!(provider_id("unknown"), None);
    }

    #[test]
    fn test_describe_collected_series() {
        use crate::models::{Indicator, Period, TimeSeries};
        use chrono::Utc;

        let metadata = SeriesMetadata {
            frequency: "Monthly".to_string(),
            units: "Percent".to_string(),
            ..SeriesMetadata::default()
        };
        let data = EconomicData {
            analysis_type: AnalysisType::EmploymentFocus,
            period: Period::OneYear,
            collected_at: Utc::now(),
            indicators: BTreeMap::new(),
            regional: [(
                "texas_unemployment".to_string(),
                Indicator {
                    id: "texas_unemployment".to_string(),
                    name: "Texas Unemployment".to_string(),
                    category: IndicatorCategory::Regional,
                    source: DataSource::Fred,
                    metadata: metadata.clone(),
                    series: TimeSeries::default(),
                },
            )]
            .into_iter()
            .collect(),
            international: BTreeMap::new(),
            market: [("gold".to_string(), TimeSeries::default())]
                .into_iter()
                .collect(),
            failures: Vec::new(),
            summary: Default::default(),
            quality: Default::default(),
        };

        let series = describe(&data);
        assert_eq!(series.len(), 2);
        assert_eq!(series["texas_unemployment"].provider_id, "TXUR");
        assert_eq!(series["texas_unemployment"].metadata, metadata);
        assert_eq!(series["gold"].provider_id, "GC=F");
        assert_eq!(series["gold"].source, DataSource::YahooFinance);
        assert_eq!(series["gold"].metadata.frequency, "Daily");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("california_unemployment"), "California Unemployment");
        assert_eq!(title_case("REAL_GDP"), "Real Gdp");
        assert_eq!(title_case("uk_gdp"), "Uk Gdp");
    }
}
