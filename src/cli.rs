//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::LlmProvider;
use crate::models::{AnalysisType, Period};
use clap::Parser;
use std::path::PathBuf;

/// Econsight - LLM-assisted economic analysis reports
///
/// Pulls public economic time series from FRED, Alpha Vantage and
/// Yahoo Finance, summarizes them, and asks a language model to write
/// the analysis. Markdown/JSON reports. Built in Rust.
///
/// Examples:
///   econsight --analysis-type comprehensive --period 5y
///   econsight --analysis-type inflation_focus --period 2y --format json
///   econsight --analysis-type employment_focus --no-regional
///   econsight --provider ollama --model llama3.2:latest --llm-url http://localhost:11434
///   econsight --dry-run
///   econsight --save-data --output reports/economy.md
///   econsight --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Type of economic analysis to perform
    #[arg(short, long, default_value = "comprehensive", value_name = "TYPE")]
    pub analysis_type: AnalysisType,

    /// Lookback period for fetched data
    #[arg(short, long, default_value = "5y")]
    pub period: Period,

    /// Output file path for the report
    ///
    /// Defaults to general.output from the config file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Model to use for analysis
    ///
    /// Can also be set via ECONSIGHT_MODEL env var or .econsight.toml config.
    #[arg(short, long, env = "ECONSIGHT_MODEL")]
    pub model: Option<String>,

    /// Chat API flavour of the model endpoint
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<LlmProvider>,

    /// Base URL of the model endpoint
    #[arg(long, value_name = "URL", env = "ECONSIGHT_LLM_URL")]
    pub llm_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .econsight.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exclude regional (state-level) data
    #[arg(long)]
    pub no_regional: bool,

    /// Exclude international comparison data
    #[arg(long)]
    pub no_international: bool,

    /// Exclude market data (indices, futures, ETFs)
    #[arg(long)]
    pub no_market: bool,

    /// Number of concurrent market data requests
    #[arg(long, value_name = "NUM")]
    pub concurrency: Option<usize>,

    /// Temperature for LLM responses (0.0 - 2.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request timeout for the model in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Also write the collected data as JSON next to the report
    #[arg(long)]
    pub save_data: bool,

    /// Dry run: fetch and summarize data without calling the model
    ///
    /// Prints the per-indicator summaries and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .econsight.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.llm_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Model URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.concurrency == Some(0) {
            return Err("Concurrency must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
