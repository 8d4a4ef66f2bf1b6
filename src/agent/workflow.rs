//! Fixed analysis workflow.
//!
//! Domain analyses (chosen by analysis type) → insights → policy
//! implications → outlook → risk assessment → executive summary. Each step
//! is one model call; a failed step is recorded and replaced by placeholder
//! text so later steps still run.

use super::llm::LanguageModel;
use crate::models::{
    AnalysisType, Domain, DomainAnalysis, EconomicData, IndicatorSummary, MarketSummary,
};
use crate::sources::catalog::{self, RISK_MARKET};
use crate::summary::{summarize, summarize_market};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

const INSIGHTS_SYSTEM: &str = "You are a chief economist providing strategic economic insights.";
const POLICY_SYSTEM: &str =
    "You are a senior policy economist advising government and central bank officials.";
const OUTLOOK_SYSTEM: &str =
    "You are a chief economist providing strategic economic forecasts and outlook.";
const RISK_SYSTEM: &str =
    "You are a senior economic risk analyst providing comprehensive risk assessment.";
const EXECUTIVE_SYSTEM: &str =
    "You are a senior economic analyst writing for C-suite executives and policymakers.";

const INSIGHTS_PLACEHOLDER: &str = "Unable to generate insights due to an error.";
const POLICY_PLACEHOLDER: &str = "Unable to generate policy implications due to an error.";
const OUTLOOK_PLACEHOLDER: &str = "Unable to generate economic outlook due to an error.";
const RISK_PLACEHOLDER: &str = "Unable to generate risk assessment due to an error.";
const EXECUTIVE_PLACEHOLDER: &str = "Unable to generate executive summary due to an error.";

/// Characters of earlier steps carried into later prompts.
const CONTEXT_CHARS: usize = 1500;

/// Indicators quoted in the risk and executive summary prompts.
const HEADLINE_INDICATORS: &[&str] = &[
    "gdp_growth",
    "cpi",
    "unemployment",
    "fed_rate",
    "yield_curve",
    "consumer_sentiment",
];

/// Text produced by a workflow run.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOutput {
    pub analyses: Vec<DomainAnalysis>,
    pub insights: String,
    pub policy_implications: String,
    pub economic_outlook: String,
    pub risk_assessment: String,
    pub executive_summary: String,
    pub recommendations: Vec<String>,
    pub errors: Vec<String>,
}

/// Domains analyzed for an analysis type.
pub fn route(analysis_type: AnalysisType) -> Vec<Domain> {
    match analysis_type {
        AnalysisType::Comprehensive => vec![
            Domain::Growth,
            Domain::Inflation,
            Domain::Employment,
            Domain::Monetary,
            Domain::Sentiment,
        ],
        AnalysisType::GdpFocus => vec![Domain::Growth],
        AnalysisType::InflationFocus => vec![Domain::Inflation],
        AnalysisType::EmploymentFocus => vec![Domain::Employment],
        AnalysisType::MonetaryPolicy => vec![Domain::Monetary],
        AnalysisType::MarketTrend => vec![Domain::Sentiment],
        AnalysisType::IndustryPerformance => vec![Domain::Industry],
    }
}

/// Run the full workflow over collected data.
pub async fn run_workflow<M: LanguageModel>(model: &M, data: &EconomicData) -> WorkflowOutput {
    let mut output = WorkflowOutput::default();

    for domain in route(data.analysis_type) {
        println!("🔎 Analyzing {}...", domain.title().to_lowercase());
        let analysis = analyze_domain(model, data, domain, &mut output.errors).await;
        output.analyses.push(analysis);
    }

    println!("💡 Generating economic insights...");
    output.insights = step(
        model,
        "insights",
        INSIGHTS_SYSTEM,
        &insights_prompt(&output.analyses),
        INSIGHTS_PLACEHOLDER,
        &mut output.errors,
    )
    .await;

    println!("🏛️  Analyzing policy implications...");
    output.policy_implications = step(
        model,
        "policy analysis",
        POLICY_SYSTEM,
        &policy_prompt(&output.insights, &output.analyses),
        POLICY_PLACEHOLDER,
        &mut output.errors,
    )
    .await;

    println!("🔮 Generating economic outlook...");
    let failed_before = output.errors.len();
    output.economic_outlook = step(
        model,
        "outlook",
        OUTLOOK_SYSTEM,
        &outlook_prompt(&output.insights, &output.policy_implications),
        OUTLOOK_PLACEHOLDER,
        &mut output.errors,
    )
    .await;
    if output.errors.len() == failed_before {
        output.recommendations = extract_recommendations(&output.economic_outlook);
    }

    let headline = headline_metrics(data);

    println!("⚠️  Assessing economic risks...");
    output.risk_assessment = step(
        model,
        "risk assessment",
        RISK_SYSTEM,
        &risk_prompt(&headline, &output.analyses, &output.economic_outlook),
        RISK_PLACEHOLDER,
        &mut output.errors,
    )
    .await;

    println!("📋 Writing executive summary...");
    output.executive_summary = step(
        model,
        "executive summary",
        EXECUTIVE_SYSTEM,
        &executive_prompt(&headline, &output.insights, &output.economic_outlook),
        EXECUTIVE_PLACEHOLDER,
        &mut output.errors,
    )
    .await;

    info!(
        "Workflow finished: {} analyses, {} errors",
        output.analyses.len(),
        output.errors.len()
    );
    output
}

/// One model call. Failures are pushed to `errors` and yield `placeholder`.
async fn step<M: LanguageModel>(
    model: &M,
    name: &str,
    system: &str,
    prompt: &str,
    placeholder: &str,
    errors: &mut Vec<String>,
) -> String {
    match model.complete(system, prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{} failed: {:#}", name, e);
            errors.push(format!("Error in {}: {:#}", name, e));
            placeholder.to_string()
        }
    }
}

async fn analyze_domain<M: LanguageModel>(
    model: &M,
    data: &EconomicData,
    domain: Domain,
    errors: &mut Vec<String>,
) -> DomainAnalysis {
    let mut analysis = domain_inputs(data, domain);

    if analysis.indicators.is_empty() && analysis.market.is_empty() && analysis.risk.is_empty() {
        warn!("No data available for {} analysis", domain.title());
        analysis.assessment = format!("No data was available for the {} analysis.", domain.title());
        return analysis;
    }

    let prompt = domain_prompt(&analysis, data);
    let name = format!("{} analysis", domain.title().to_lowercase());
    let placeholder = format!("Unable to generate the {} assessment due to an error.", domain.title());

    analysis.assessment = step(
        model,
        &name,
        domain_system_prompt(domain),
        &prompt,
        &placeholder,
        errors,
    )
    .await;

    analysis
}

/// Summaries handed to the model for one domain.
fn domain_inputs(data: &EconomicData, domain: Domain) -> DomainAnalysis {
    let compute_yoy = domain == Domain::Inflation;

    let mut indicators: BTreeMap<_, _> = catalog::domain_indicators(domain)
        .iter()
        .filter_map(|id| data.indicators.get(*id).map(|i| (id.to_string(), i)))
        .filter(|(_, i)| !i.series.is_empty())
        .map(|(id, i)| (id, summarize(&i.series, compute_yoy)))
        .collect();

    let extra = match domain {
        Domain::Employment => Some(&data.regional),
        Domain::Growth => Some(&data.international),
        _ => None,
    };
    if let Some(extra) = extra {
        indicators.extend(
            extra
                .iter()
                .filter(|(_, i)| !i.series.is_empty())
                .map(|(id, i)| (id.clone(), summarize(&i.series, false))),
        );
    }

    let mut market = BTreeMap::new();
    let mut risk = BTreeMap::new();
    if domain == Domain::Sentiment {
        for (name, series) in &data.market {
            let target = if name == RISK_MARKET { &mut risk } else { &mut market };
            target.insert(name.clone(), summarize_market(series));
        }
    }

    DomainAnalysis {
        domain,
        indicators,
        market,
        risk,
        assessment: String::new(),
    }
}

fn domain_system_prompt(domain: Domain) -> &'static str {
    match domain {
        Domain::Growth => "You are a senior economist specializing in economic growth analysis.",
        Domain::Inflation => "You are an inflation expert and monetary policy analyst.",
        Domain::Employment => "You are a labor economist specializing in employment analysis.",
        Domain::Monetary => "You are a monetary policy expert and Federal Reserve analyst.",
        Domain::Sentiment => "You are a market sentiment analyst and behavioral economist.",
        Domain::Industry => "You are an industry analyst specializing in sector performance.",
    }
}

fn domain_focus(domain: Domain) -> &'static str {
    match domain {
        Domain::Growth => {
            "Assess overall growth, its key trends, strengths and weaknesses, how it compares to historical norms, and whether it is sustainable."
        }
        Domain::Inflation => {
            "Assess the inflation level and trend, core versus headline dynamics, price pressures, and how it compares with the 2% target."
        }
        Domain::Employment => {
            "Assess labor market health, job creation, participation, labor market tightness, and regional variations where data is available."
        }
        Domain::Monetary => {
            "Assess the policy stance, the shape of the yield curve, financial conditions, and the likely path of policy rates."
        }
        Domain::Sentiment => {
            "Assess consumer confidence, market performance, risk appetite and volatility, and how sentiment may affect the economy."
        }
        Domain::Industry => {
            "Assess industrial output, capacity use, sector employment, energy prices, and the outlook for industry."
        }
    }
}

/// One indicator as shown to the model: labels plus its summary.
#[derive(Serialize)]
struct IndicatorInput<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "is_unknown")]
    units: &'a str,
    #[serde(skip_serializing_if = "is_unknown")]
    frequency: &'a str,
    #[serde(flatten)]
    summary: &'a IndicatorSummary,
}

fn is_unknown(value: &&str) -> bool {
    value.is_empty() || *value == "Unknown"
}

#[derive(Serialize)]
struct DomainPayload<'a> {
    indicators: BTreeMap<&'a str, IndicatorInput<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    market_performance: &'a BTreeMap<String, MarketSummary>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    risk_indicators: &'a BTreeMap<String, MarketSummary>,
}

fn domain_prompt(analysis: &DomainAnalysis, data: &EconomicData) -> String {
    let indicators = analysis
        .indicators
        .iter()
        .map(|(id, summary)| {
            let indicator = data.indicator(id);
            let input = IndicatorInput {
                name: indicator.map_or(id.as_str(), |i| i.name.as_str()),
                units: indicator.map_or("", |i| i.metadata.units.as_str()),
                frequency: indicator.map_or("", |i| i.metadata.frequency.as_str()),
                summary,
            };
            (id.as_str(), input)
        })
        .collect();

    let payload = DomainPayload {
        indicators,
        market_performance: &analysis.market,
        risk_indicators: &analysis.risk,
    };
    // Summaries only hold plain numbers and dates
    let json = serde_json::to_string_pretty(&payload).unwrap_or_default();

    format!(
        "Analyze the {} situation based on the following data:\n\n{}\n\n{} Be specific and data-driven.",
        analysis.domain.title().to_lowercase(),
        json,
        domain_focus(analysis.domain)
    )
}

fn insights_prompt(analyses: &[DomainAnalysis]) -> String {
    let mut prompt = String::from(
        "Based on the economic analyses below, provide key economic insights: main themes and how they connect, the position in the economic cycle, major risks and opportunities, and any contradictions between indicators.\n",
    );
    for analysis in analyses {
        prompt.push_str(&format!(
            "\n## {}\n{}\n",
            analysis.domain.title(),
            analysis.assessment
        ));
    }
    prompt
}

fn policy_prompt(insights: &str, analyses: &[DomainAnalysis]) -> String {
    let mut prompt = format!(
        "Based on the economic insights below, analyze the implications for monetary, fiscal, regulatory and trade policy, and the risks of each policy path.\n\nEconomic insights:\n{}\n\nKey conditions:\n",
        insights
    );
    for analysis in analyses {
        prompt.push_str(&format!(
            "- {}: {}\n",
            analysis.domain.title(),
            excerpt(&analysis.assessment, 300)
        ));
    }
    prompt
}

fn outlook_prompt(insights: &str, policy: &str) -> String {
    format!(
        "Based on the analysis below, give the economic outlook for the short term (3-6 months), medium term (6-18 months) and long term (2-5 years), the main risks to monitor, and early warning indicators. End with a numbered list of actionable recommendations.\n\nEconomic insights:\n{}\n\nPolicy implications:\n{}",
        excerpt(insights, CONTEXT_CHARS),
        excerpt(policy, CONTEXT_CHARS)
    )
}

fn risk_prompt(headline: &str, analyses: &[DomainAnalysis], outlook: &str) -> String {
    let sectors = analyses
        .iter()
        .find(|a| a.domain == Domain::Industry)
        .map_or("Not analyzed.".to_string(), |a| excerpt(&a.assessment, 800));

    format!(
        "Based on the economic analysis below, identify and assess the key economic risks: immediate risks (0-6 months), medium-term risks (6-18 months), long-term structural risks (1-5 years), and mitigation strategies. Focus on specific, actionable risk factors with probability assessments where possible.\n\nEconomic conditions:\n{}\n\nSector performance:\n{}\n\nEconomic outlook:\n{}",
        headline,
        sectors,
        excerpt(outlook, CONTEXT_CHARS)
    )
}

fn executive_prompt(headline: &str, insights: &str, outlook: &str) -> String {
    format!(
        "Write a concise executive summary of three to four paragraphs for an economic analysis report. Summarize the current economic state, highlight key trends, identify major risks and opportunities, and give the near-term outlook. Use professional, accessible language suitable for executives and policymakers.\n\nKey metrics:\n{}\n\nKey insights:\n{}\n\nOutlook:\n{}",
        headline,
        excerpt(insights, CONTEXT_CHARS),
        excerpt(outlook, CONTEXT_CHARS)
    )
}

/// One line per collected headline indicator.
fn headline_metrics(data: &EconomicData) -> String {
    let lines: Vec<String> = HEADLINE_INDICATORS
        .iter()
        .filter_map(|id| data.indicators.get(*id).map(|i| (*id, i)))
        .filter_map(|(id, indicator)| {
            let summary = summarize(&indicator.series, id == "cpi");
            let (value, date) = summary.latest_value.zip(summary.latest_timestamp)?;

            let mut line = format!("- {}: {:.2}", indicator.name, value);
            if !is_unknown(&indicator.metadata.units.as_str()) {
                line.push_str(&format!(" ({})", indicator.metadata.units));
            }
            line.push_str(&format!(" as of {}", date));
            if let Some(change) = summary.recent_change {
                line.push_str(&format!(", recent change {:+.2}", change));
            }
            if let Some(yoy) = summary.year_over_year_change_pct {
                line.push_str(&format!(", year over year {:+.2}%", yoy));
            }
            Some(line)
        })
        .collect();

    if lines.is_empty() {
        "- No headline indicators were collected.".to_string()
    } else {
        lines.join("\n")
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Numbered or bulleted lines of the outlook, or the whole outlook.
pub fn extract_recommendations(outlook: &str) -> Vec<String> {
    let items: Vec<String> = outlook
        .lines()
        .filter_map(|line| strip_list_marker(line.trim()))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if !items.is_empty() {
        return items;
    }

    let whole = outlook.trim();
    if whole.is_empty() {
        Vec::new()
    } else {
        vec![whole.to_string()]
    }
}

fn strip_list_marker(line: &str) -> Option<&str> {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some(rest.trim());
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DataSource, Indicator, IndicatorCategory, Period, SeriesMetadata, TimeSeries,
    };
    use anyhow::{anyhow, Result};
    use chrono::{NaiveDate, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records the prompts it was sent.
    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<&str, &str>>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(String::from))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl LanguageModel for ScriptedModel {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(user.to_string());
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(anyhow!(e)),
                None => Err(anyhow!("script exhausted")),
            }
        }
    }

    fn monthly(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        TimeSeries::from_values(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + chrono::Months::new(i as u32), *v)),
        )
    }

    fn indicator(id: &str, series: TimeSeries) -> (String, Indicator) {
        (
            id.to_string(),
            Indicator {
                id: id.to_string(),
                name: id.to_string(),
                category: IndicatorCategory::Inflation,
                source: DataSource::Fred,
                metadata: SeriesMetadata {
                    frequency: "Monthly".to_string(),
                    units: "Percent".to_string(),
                    ..SeriesMetadata::default()
                },
                series,
            },
        )
    }

    fn data(analysis_type: AnalysisType) -> EconomicData {
        let cpi: Vec<f64> = (0..13).map(|i| 100.0 + i as f64 * 10.0 / 12.0).collect();
        EconomicData {
            analysis_type,
            period: Period::FiveYears,
            collected_at: Utc::now(),
            indicators: vec![
                indicator("cpi", monthly(&cpi)),
                indicator("unemployment", monthly(&[4.0, 4.1])),
                indicator("consumer_sentiment", monthly(&[70.0, 72.0])),
            ]
            .into_iter()
            .collect(),
            regional: BTreeMap::new(),
            international: BTreeMap::new(),
            market: vec![
                ("sp500".to_string(), monthly(&[100.0, 101.0])),
                ("vix".to_string(), monthly(&[15.0, 14.0])),
            ]
            .into_iter()
            .collect(),
            failures: Vec::new(),
            summary: Default::default(),
            quality: Default::default(),
        }
    }

    #[test]
    fn test_route_table() {
        assert_eq!(route(AnalysisType::Comprehensive).len(), 5);
        assert!(!route(AnalysisType::Comprehensive).contains(&Domain::Industry));
        assert_eq!(route(AnalysisType::GdpFocus), vec![Domain::Growth]);
        assert_eq!(route(AnalysisType::InflationFocus), vec![Domain::Inflation]);
        assert_eq!(route(AnalysisType::EmploymentFocus), vec![Domain::Employment]);
        assert_eq!(route(AnalysisType::MonetaryPolicy), vec![Domain::Monetary]);
        assert_eq!(route(AnalysisType::MarketTrend), vec![Domain::Sentiment]);
        assert_eq!(
            route(AnalysisType::IndustryPerformance),
            vec![Domain::Industry]
        );
    }

    #[test]
    fn test_inflation_inputs_include_yoy() {
        let inputs = domain_inputs(&data(AnalysisType::InflationFocus), Domain::Inflation);
        let cpi = &inputs.indicators["cpi"];
        let yoy = cpi.year_over_year_change_pct.unwrap();
        assert!((yoy - 10.0).abs() < 1e-9);
        assert!(inputs.market.is_empty());
    }

    #[test]
    fn test_sentiment_inputs_split_risk() {
        let inputs = domain_inputs(&data(AnalysisType::MarketTrend), Domain::Sentiment);
        assert!(inputs.indicators.contains_key("consumer_sentiment"));
        assert!(inputs.market.contains_key("sp500"));
        assert!(!inputs.market.contains_key("vix"));
        assert!(inputs.risk.contains_key("vix"));
    }

    #[test]
    fn test_workflow_happy_path() {
        let model = ScriptedModel::new(vec![
            Ok("Inflation is cooling."),
            Ok("Insight text"),
            Ok("Policy text"),
            Ok("Outlook:\n1. Watch core CPI\n2) Hold rates\n- Rebalance duration"),
            Ok("Risk text"),
            Ok("Summary text"),
        ]);

        let output = tokio_test::block_on(run_workflow(
            &model,
            &data(AnalysisType::InflationFocus),
        ));

        assert!(output.errors.is_empty());
        assert_eq!(output.analyses.len(), 1);
        assert_eq!(output.analyses[0].assessment, "Inflation is cooling.");
        assert_eq!(output.insights, "Insight text");
        assert_eq!(output.policy_implications, "Policy text");
        assert_eq!(output.risk_assessment, "Risk text");
        assert_eq!(output.executive_summary, "Summary text");
        assert_eq!(
            output.recommendations,
            vec!["Watch core CPI", "Hold rates", "Rebalance duration"]
        );

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 6);
        assert!(prompts[0].contains("\"cpi\""));
        assert!(prompts[0].contains("\"frequency\": \"Monthly\""));
        assert!(prompts[0].contains("\"units\": \"Percent\""));
        assert!(prompts[1].contains("Inflation is cooling."));
        assert!(prompts[2].contains("Insight text"));
        assert!(prompts[3].contains("Policy text"));
        assert!(prompts[4].contains("Watch core CPI"));
        assert!(prompts[4].contains("- cpi: 110.00 (Percent)"));
        assert!(prompts[5].contains("Insight text"));
        assert!(prompts[5].contains("year over year +10.00%"));
    }

    #[test]
    fn test_workflow_records_failures_and_continues() {
        let model = ScriptedModel::new(vec![
            Ok("Labor market is tight."),
            Err("connection refused"),
            Ok("Policy text"),
            Err("timeout"),
            Ok("Risk text"),
            Err("rate limited"),
        ]);

        let output = tokio_test::block_on(run_workflow(
            &model,
            &data(AnalysisType::EmploymentFocus),
        ));

        assert_eq!(output.errors.len(), 3);
        assert!(output.errors[0].contains("insights"));
        assert!(output.errors[1].contains("outlook"));
        assert!(output.errors[2].contains("executive summary"));
        assert_eq!(output.insights, INSIGHTS_PLACEHOLDER);
        assert_eq!(output.policy_implications, "Policy text");
        assert_eq!(output.economic_outlook, OUTLOOK_PLACEHOLDER);
        assert_eq!(output.risk_assessment, "Risk text");
        assert_eq!(output.executive_summary, EXECUTIVE_PLACEHOLDER);
        assert!(output.recommendations.is_empty());
        assert!(model.prompts()[2].contains(INSIGHTS_PLACEHOLDER));
        assert!(model.prompts()[4].contains(OUTLOOK_PLACEHOLDER));
    }

    #[test]
    fn test_domain_without_data_skips_model() {
        let model = ScriptedModel::new(vec![
            Ok("insights"),
            Ok("policy"),
            Ok("outlook"),
            Ok("risks"),
            Ok("summary"),
        ]);

        let output = tokio_test::block_on(run_workflow(
            &model,
            &data(AnalysisType::MonetaryPolicy),
        ));

        assert!(output.errors.is_empty());
        assert!(output.analyses[0].assessment.starts_with("No data"));
        assert_eq!(model.prompts().len(), 5);
        assert_eq!(output.recommendations, vec!["outlook"]);
        assert!(model.prompts()[3].contains("Sector performance:\nNot analyzed."));
    }

    #[test]
    fn test_extract_recommendations() {
        assert_eq!(
            extract_recommendations("Intro\n10. Tenth item\n• Bullet\nplain"),
            vec!["Tenth item", "Bullet"]
        );
        assert_eq!(
            extract_recommendations("  Stay the course.  "),
            vec!["Stay the course."]
        );
        assert!(extract_recommendations("   ").is_empty());
        // years are not list markers
        assert_eq!(
            extract_recommendations("2025 looks weak"),
            vec!["2025 looks weak"]
        );
    }
}
