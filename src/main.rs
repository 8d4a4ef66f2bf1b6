//! Econsight - LLM-assisted economic analysis reports
//!
//! A CLI tool that pulls public economic time series (FRED, Alpha
//! Vantage, Yahoo Finance), summarizes them, and asks a language model to
//! write a structured economic analysis report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, no data, model failure, etc.)

mod agent;
mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod sources;
mod summary;

use agent::{ChatClient, LanguageModel};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, Credentials, CONFIG_FILE_NAME};
use models::{EconomicData, IndicatorSummary, Report, ReportMetadata};
use sources::{CollectRequest, Collector};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("Econsight v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_analysis(args).await {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .econsight.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the model, data sources, pacing, and report sections.");
    println!("   API keys are read from OPENAI_API_KEY, FRED_API_KEY and ALPHA_VANTAGE_API_KEY.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Collect data, run the workflow and write the report.
async fn run_analysis(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let credentials = Credentials::from_env();
    debug!("Credentials: {:?}", credentials);

    // Fail on a missing model key before spending minutes on collection
    let client = if args.dry_run {
        None
    } else {
        Some(ChatClient::new(&config.model, credentials.openai_api_key.clone())?)
    };

    println!("📈 Econsight economic analysis");
    println!("   Analysis: {}", args.analysis_type);
    println!("   Period: {}", args.period);
    if !args.dry_run {
        println!("   Model: {} ({})", config.model.name, config.model.base_url);
    }

    // Step 1: Collect data
    println!("\n📥 Collecting economic data...");
    let collector = Collector::new(
        &config.sources,
        &credentials,
        config.general.concurrency,
    )?;
    let request = CollectRequest {
        analysis_type: args.analysis_type,
        period: args.period,
        include_regional: config.sources.include_regional,
        include_international: config.sources.include_international,
        include_market: config.sources.include_market,
        show_progress: !args.quiet,
    };
    let data = collector.collect(&request).await;

    if data.indicators.is_empty() && data.market.is_empty() {
        bail!(
            "No data could be collected ({} failed requests). Check your network and API keys.",
            data.failures.len()
        );
    }

    println!(
        "   Collected {} indicators and {} market series ({} failures)",
        data.indicators.len(),
        data.market.len(),
        data.failures.len()
    );

    let data_summary = analysis::summarize_all(&data.indicators, true);
    let output_path = output_path(&args, &config);

    if config.report.save_data {
        let data_path = output_path.with_extension("data.json");
        report::write_data(&data, &data_path)?;
        println!("   Collected data saved to: {}", data_path.display());
    }

    // Handle --dry-run: print summaries and exit
    let Some(client) = client else {
        handle_dry_run(&data, &data_summary);
        return Ok(());
    };

    // Step 2: Run the analysis workflow
    println!("\n🤖 Running analysis with {}...", client.model_name());
    let output = agent::run_workflow(&client, &data).await;

    // Step 3: Build and save the report
    println!("\n📝 Generating report...");

    let metadata = ReportMetadata {
        analysis_type: data.analysis_type,
        period: data.period,
        analysis_date: Utc::now(),
        model_used: client.model_name().to_string(),
        indicators_analyzed: data.indicators.len(),
        fetch_failures: data.failures.len(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        data_summary,
        series: sources::catalog::describe(&data),
        statistics: data.summary.clone(),
        data_quality: data.quality.clone(),
        executive_summary: output.executive_summary,
        analyses: output.analyses,
        insights: output.insights,
        policy_implications: output.policy_implications,
        economic_outlook: output.economic_outlook,
        risk_assessment: output.risk_assessment,
        recommendations: output.recommendations,
        errors: output.errors,
    };

    report::write_report(&report, &output_path, args.format, &config.report)?;

    println!("\n📊 Analysis Summary:");
    println!("   Domains analyzed: {}", report.analyses.len());
    println!("   Indicators: {}", report.metadata.indicators_analyzed);
    println!("   Recommendations: {}", report.recommendations.len());
    if !report.errors.is_empty() {
        println!("   ⚠️  Steps with errors: {}", report.errors.len());
    }
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Handle --dry-run: print the per-indicator summaries.
fn handle_dry_run(data: &EconomicData, summaries: &BTreeMap<String, IndicatorSummary>) {
    println!("\n🔍 Dry run: indicator summaries (no model calls)\n");

    for (id, summary) in summaries {
        let Some(indicator) = data.indicators.get(id) else {
            continue;
        };
        let latest = match (summary.latest_value, summary.latest_timestamp) {
            (Some(value), Some(date)) => format!("{:.2} ({})", value, date),
            _ => "no data".to_string(),
        };
        let yoy = summary
            .year_over_year_change_pct
            .map(|v| format!(", YoY {:+.2}%", v))
            .unwrap_or_default();
        let percentile = summary
            .historical_percentile
            .map(|p| format!(", {:.0}th pct", p))
            .unwrap_or_default();

        println!(
            "   {} {} [{}, {}]: {}{}{}",
            summary.recent_direction.arrow(),
            indicator.name,
            indicator.metadata.units,
            indicator.metadata.frequency.to_lowercase(),
            latest,
            yoy,
            percentile
        );
    }

    println!();
    for line in analysis::generate_summary_text(&data.summary).lines() {
        println!("   {}", line);
    }

    if !data.quality.issues.is_empty() {
        println!("\n   Data quality issues:");
        for issue in &data.quality.issues {
            println!("     ⚠️  {}", issue);
        }
    }

    println!("\n✅ Dry run complete. No model calls were made.");
}

/// Report path: --output, else the configured path (with a .json
/// extension for JSON output).
fn output_path(args: &Args, config: &Config) -> PathBuf {
    if let Some(ref path) = args.output {
        return path.clone();
    }

    let path = PathBuf::from(&config.general.output);
    match args.format {
        OutputFormat::Json => path.with_extension("json"),
        OutputFormat::Markdown => path,
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
