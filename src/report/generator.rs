//! Markdown and JSON report generation.
//!
//! This module renders the final [`Report`] as a Markdown document built
//! from one helper per section, or as pretty-printed JSON.

use crate::analysis::top_movers;
use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::models::{
    DataQualityReport, DomainAnalysis, EconomicData, IndicatorSummary, MarketSummary, Report,
    ReportMetadata, SeriesInfo,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# Economic Analysis Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report, options));
    output.push_str(&generate_text_section(
        "Executive Summary",
        &report.executive_summary,
    ));

    if options.include_data_table {
        output.push_str(&generate_data_summary_section(report, options.top_movers));
    }
    if options.include_quality {
        output.push_str(&generate_quality_section(&report.data_quality));
    }

    for analysis in &report.analyses {
        output.push_str(&generate_domain_section(analysis, &report.series));
    }

    output.push_str(&generate_text_section("Key Insights", &report.insights));
    output.push_str(&generate_text_section(
        "Policy Implications",
        &report.policy_implications,
    ));
    output.push_str(&generate_text_section(
        "Economic Outlook",
        &report.economic_outlook,
    ));
    output.push_str(&generate_text_section(
        "Risk Assessment",
        &report.risk_assessment,
    ));
    output.push_str(&generate_recommendations_section(&report.recommendations));
    if options.include_appendix {
        output.push_str(&generate_appendix(report));
    }
    output.push_str(&generate_errors_section(&report.errors));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Analysis Type:** {}\n",
        metadata.analysis_type.as_str().replace('_', " ")
    ));
    section.push_str(&format!("- **Period:** {}\n", metadata.period));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!(
        "- **Indicators Analyzed:** {}\n",
        metadata.indicators_analyzed
    ));
    if metadata.fetch_failures > 0 {
        section.push_str(&format!(
            "- **Fetch Failures:** {}\n",
            metadata.fetch_failures
        ));
    }
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report, options: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Executive Summary](#executive-summary)\n");

    if options.include_data_table {
        toc.push_str("- [Data Summary](#data-summary)\n");
    }
    if options.include_quality {
        toc.push_str("- [Data Quality](#data-quality)\n");
    }

    for analysis in &report.analyses {
        let title = analysis.domain.title();
        toc.push_str(&format!("- [{}](#{})\n", title, anchor(title)));
    }

    toc.push_str("- [Key Insights](#key-insights)\n");
    toc.push_str("- [Policy Implications](#policy-implications)\n");
    toc.push_str("- [Economic Outlook](#economic-outlook)\n");
    toc.push_str("- [Risk Assessment](#risk-assessment)\n");

    if !report.recommendations.is_empty() {
        toc.push_str("- [Recommendations](#recommendations)\n");
    }
    if options.include_appendix {
        toc.push_str("- [Data Sources and Methodology](#data-sources-and-methodology)\n");
    }
    if !report.errors.is_empty() {
        toc.push_str("- [Errors](#errors)\n");
    }

    toc.push('\n');

    toc
}

/// Generate the per-indicator data table and the top movers.
fn generate_data_summary_section(report: &Report, movers: usize) -> String {
    let mut section = String::new();

    section.push_str("## Data Summary\n\n");

    if report.data_summary.is_empty() {
        section.push_str("No indicator data was collected.\n\n");
        return section;
    }

    section.push_str(&indicator_table(&report.data_summary, &report.series));

    let top = top_movers(&report.statistics, movers);
    if !top.is_empty() {
        section.push_str("### Top Movers\n\n");
        section.push_str("| Indicator | Change | % Change |\n");
        section.push_str("|:---|---:|---:|\n");

        for (id, trend) in top {
            section.push_str(&format!(
                "| {} | {} {:.2} | {:+.2}% |\n",
                display_name(id, &report.series),
                trend.direction.arrow(),
                trend.recent_change,
                trend.percent_change
            ));
        }
        section.push('\n');
    }

    section
}

fn indicator_table(
    summaries: &BTreeMap<String, IndicatorSummary>,
    series: &BTreeMap<String, SeriesInfo>,
) -> String {
    let mut table = String::new();

    table.push_str(
        "| Indicator | Units | Frequency | Latest | Date | Change | Direction | YoY | Percentile |\n",
    );
    table.push_str("|:---|:---|:---|---:|:---:|---:|:---:|---:|---:|\n");

    for (id, summary) in summaries {
        let info = series.get(id);
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} {} | {} | {} |\n",
            display_name(id, series),
            info.map_or("N/A", |i| i.metadata.units.as_str()),
            info.map_or("N/A", |i| i.metadata.frequency.as_str()),
            fmt_value(summary.latest_value),
            summary
                .latest_timestamp
                .map(|d| d.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            fmt_value(summary.recent_change),
            summary.recent_direction.arrow(),
            summary.recent_direction,
            fmt_pct(summary.year_over_year_change_pct),
            fmt_pct(summary.historical_percentile),
        ));
    }
    table.push('\n');

    table
}

/// Generate the data quality section.
fn generate_quality_section(quality: &DataQualityReport) -> String {
    let mut section = String::new();

    section.push_str("## Data Quality\n\n");
    section.push_str(&format!(
        "| Indicators | Successful | Failed |\n|:---:|:---:|:---:|\n| {} | {} | {} |\n\n",
        quality.total_indicators, quality.successful_fetches, quality.failed_fetches
    ));

    if !quality.sources.is_empty() {
        section.push_str("### Sources\n\n");
        section.push_str("| Source | Indicators |\n");
        section.push_str("|:---|:---:|\n");
        for (source, count) in &quality.sources {
            section.push_str(&format!("| {} | {} |\n", source, count));
        }
        section.push('\n');
    }

    if !quality.freshness.is_empty() {
        section.push_str("### Coverage\n\n");
        section.push_str("| Indicator | Completeness | Latest | Age (days) | Status |\n");
        section.push_str("|:---|---:|:---:|---:|:---|\n");
        for (id, freshness) in &quality.freshness {
            let completeness = quality
                .completeness
                .get(id)
                .map(|c| format!("{:.1}%", c.completeness_pct))
                .unwrap_or_else(|| "N/A".to_string());
            section.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                id, completeness, freshness.latest_date, freshness.days_old, freshness.status
            ));
        }
        section.push('\n');
    }

    if !quality.issues.is_empty() {
        section.push_str("### Issues\n\n");
        for issue in &quality.issues {
            section.push_str(&format!("- ⚠️ {}\n", issue));
        }
        section.push('\n');
    }

    section
}

/// Generate one domain analysis section.
fn generate_domain_section(
    analysis: &DomainAnalysis,
    series: &BTreeMap<String, SeriesInfo>,
) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", analysis.domain.title()));

    if !analysis.indicators.is_empty() {
        section.push_str("<details>\n<summary>Indicators</summary>\n\n");
        section.push_str(&indicator_table(&analysis.indicators, series));
        section.push_str("</details>\n\n");
    }

    if !analysis.market.is_empty() || !analysis.risk.is_empty() {
        section.push_str(&market_table(&analysis.market, &analysis.risk));
    }

    section.push_str(analysis.assessment.trim());
    section.push_str("\n\n");

    section
}

fn market_table(
    market: &BTreeMap<String, MarketSummary>,
    risk: &BTreeMap<String, MarketSummary>,
) -> String {
    let mut table = String::new();

    table.push_str("| Market | Latest | Daily Change | Annualized Volatility |\n");
    table.push_str("|:---|---:|---:|---:|\n");

    let rows = market
        .iter()
        .map(|(name, summary)| (name.clone(), summary))
        .chain(risk.iter().map(|(name, summary)| (format!("{} (risk)", name), summary)));

    for (name, summary) in rows {
        table.push_str(&format!(
            "| {} | {} | {} {} | {} |\n",
            name,
            fmt_value(summary.latest_price),
            summary.direction.arrow(),
            fmt_pct(summary.price_change_pct),
            fmt_pct(summary.annualized_volatility.map(|v| v * 100.0)),
        ));
    }
    table.push('\n');

    table
}

/// Generate a titled block of model text.
fn generate_text_section(title: &str, text: &str) -> String {
    let body = if text.trim().is_empty() {
        "Not available."
    } else {
        text.trim()
    };
    format!("## {}\n\n{}\n\n", title, body)
}

/// Generate the recommendations section.
fn generate_recommendations_section(recommendations: &[String]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Recommendations\n\n");

    for (i, rec) in recommendations.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    section.push('\n');

    section
}

fn generate_errors_section(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut section = String::from("## Errors\n\nSome steps did not complete:\n\n");
    for error in errors {
        section.push_str(&format!("- ❌ {}\n", error));
    }
    section.push('\n');

    section
}

/// Generate the data sources and methodology appendix.
fn generate_appendix(report: &Report) -> String {
    let mut section = String::new();

    section.push_str("## Data Sources and Methodology\n\n");
    section.push_str(&format!("- **Analysis Period:** {}\n", report.metadata.period));
    section.push_str(&format!(
        "- **Generated:** {}\n\n",
        report.metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if !report.series.is_empty() {
        section.push_str("### Series Analyzed\n\n");
        section.push_str(
            "| Series | Source | Provider ID | Frequency | Units | Seasonal Adjustment |\n",
        );
        section.push_str("|:---|:---|:---|:---|:---|:---|\n");
        for info in report.series.values() {
            section.push_str(&format!(
                "| {} | {} | `{}` | {} | {} | {} |\n",
                info.name,
                info.source,
                info.provider_id,
                info.metadata.frequency,
                info.metadata.units,
                info.metadata.seasonal_adjustment
            ));
        }
        section.push('\n');
    }

    section.push_str("### Methodology\n\n");
    section.push_str("- **Recent change:** difference between the last two observations.\n");
    section.push_str(
        "- **Year-over-year change:** percentage change against the observation 12 positions earlier. \
         This is an annual comparison only for monthly series.\n",
    );
    section.push_str(
        "- **Volatility:** sample standard deviation of the last 10 period-over-period fractional changes.\n",
    );
    section.push_str(
        "- **Historical percentile:** share of observations in the period at or below the latest value.\n",
    );
    section.push_str(
        "- **Market volatility:** standard deviation of daily returns annualized by √252, from at least 20 closes.\n",
    );
    section.push_str(&format!(
        "- **Narrative:** written by `{}` from the summaries above.\n\n",
        report.metadata.model_used
    ));

    section.push_str("### Limitations\n\n");
    section.push_str("- Historical data does not predict future performance.\n");
    section.push_str("- Forecasts are subject to uncertainty and external shocks.\n");
    section.push_str("- Model-written sections only reflect the data the model was given.\n\n");

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(concat!(
        "*Report generated by econsight ",
        env!("CARGO_PKG_VERSION"),
        ". Figures come from public data; the narrative is model-written and is not financial advice.*\n"
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the report in `format` and write it to `path`.
pub fn write_report(
    report: &Report,
    path: &Path,
    format: OutputFormat,
    options: &ReportConfig,
) -> Result<()> {
    let content = match format {
        OutputFormat::Markdown => generate_markdown_report(report, options),
        OutputFormat::Json => generate_json_report(report)?,
    };

    write_file(path, &content)
}

/// Write the collected data snapshot as pretty-printed JSON.
pub fn write_data(data: &EconomicData, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(data).context("Failed to serialize collected data")?;
    write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn display_name<'a>(id: &'a str, series: &'a BTreeMap<String, SeriesInfo>) -> &'a str {
    series.get(id).map_or(id, |info| info.name.as_str())
}

fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' => Some(c),
            _ => None,
        })
        .collect()
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "N/A".to_string(),
    }
}
