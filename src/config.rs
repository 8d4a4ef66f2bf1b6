//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.econsight.toml` files, CLI arguments and the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".econsight.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Language model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Data provider settings.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Number of concurrent market data requests.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_output() -> String {
    "economic_report.md".to_string()
}

fn default_concurrency() -> usize {
    4
}

/// Chat API flavour spoken by the model endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible `/v1/chat/completions`
    #[default]
    #[value(name = "openai")]
    OpenAi,
    /// Ollama `/api/chat`
    Ollama,
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API flavour.
    #[serde(default)]
    pub provider: LlmProvider,

    /// Model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Base URL of the chat API.
    #[serde(default = "default_llm_url")]
    pub base_url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of retries on failure.
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            name: default_model(),
            base_url: default_llm_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

/// Local Ollama server used when switching provider without a URL.
const OLLAMA_URL: &str = "http://localhost:11434";

fn default_llm_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> Option<u32> {
    Some(4000)
}

fn default_timeout() -> u64 {
    300
}

fn default_retries() -> usize {
    3
}

/// Data provider endpoints, pacing and coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// FRED API base URL.
    #[serde(default = "default_fred_url")]
    pub fred_url: String,

    /// Alpha Vantage query endpoint.
    #[serde(default = "default_alpha_vantage_url")]
    pub alpha_vantage_url: String,

    /// Yahoo Finance API base URL.
    #[serde(default = "default_yahoo_url")]
    pub yahoo_url: String,

    /// Delay between consecutive FRED requests.
    #[serde(default = "default_fred_delay")]
    pub fred_delay_ms: u64,

    /// Delay between consecutive Alpha Vantage requests (free tier: 5/min).
    #[serde(default = "default_alpha_vantage_delay")]
    pub alpha_vantage_delay_ms: u64,

    /// Delay between consecutive Yahoo Finance requests.
    #[serde(default = "default_yahoo_delay")]
    pub yahoo_delay_ms: u64,

    /// Per-request timeout for data providers.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Fetch state-level series.
    #[serde(default = "default_true")]
    pub include_regional: bool,

    /// Fetch foreign GDP series.
    #[serde(default = "default_true")]
    pub include_international: bool,

    /// Fetch market indices and futures.
    #[serde(default = "default_true")]
    pub include_market: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            fred_url: default_fred_url(),
            alpha_vantage_url: default_alpha_vantage_url(),
            yahoo_url: default_yahoo_url(),
            fred_delay_ms: default_fred_delay(),
            alpha_vantage_delay_ms: default_alpha_vantage_delay(),
            yahoo_delay_ms: default_yahoo_delay(),
            request_timeout_seconds: default_request_timeout(),
            include_regional: true,
            include_international: true,
            include_market: true,
        }
    }
}

fn default_fred_url() -> String {
    "https://api.stlouisfed.org/fred".to_string()
}

fn default_alpha_vantage_url() -> String {
    "https://www.alphavantage.co/query".to_string()
}

fn default_yahoo_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_fred_delay() -> u64 {
    500
}

fn default_alpha_vantage_delay() -> u64 {
    12_000
}

fn default_yahoo_delay() -> u64 {
    100
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the data quality section.
    #[serde(default = "default_true")]
    pub include_quality: bool,

    /// Include the per-indicator data table.
    #[serde(default = "default_true")]
    pub include_data_table: bool,

    /// Include the data sources and methodology appendix.
    #[serde(default = "default_true")]
    pub include_appendix: bool,

    /// Number of largest movers listed in the summary.
    #[serde(default = "default_top_movers")]
    pub top_movers: usize,

    /// Also write the collected data next to the report.
    #[serde(default)]
    pub save_data: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_quality: true,
            include_data_table: true,
            include_appendix: true,
            top_movers: default_top_movers(),
            save_data: false,
        }
    }
}

fn default_top_movers() -> usize {
    5
}

/// API keys, read from the environment only.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub fred_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
}

impl Credentials {
    /// Read keys from `OPENAI_API_KEY`, `FRED_API_KEY` and `ALPHA_VANTAGE_API_KEY`.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        Self {
            openai_api_key: var("OPENAI_API_KEY"),
            fred_api_key: var("FRED_API_KEY"),
            alpha_vantage_api_key: var("ALPHA_VANTAGE_API_KEY"),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Credentials")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("fred_api_key", &mask(&self.fred_api_key))
            .field("alpha_vantage_api_key", &mask(&self.alpha_vantage_api_key))
            .finish()
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.econsight.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// where the CLI provides an explicit value.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(provider) = args.provider {
            self.model.provider = provider;
            if provider == LlmProvider::Ollama && self.model.base_url == default_llm_url() {
                self.model.base_url = OLLAMA_URL.to_string();
            }
        }
        if let Some(ref url) = args.llm_url {
            self.model.base_url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        if args.no_regional {
            self.sources.include_regional = false;
        }
        if args.no_international {
            self.sources.include_international = false;
        }
        if args.no_market {
            self.sources.include_market = false;
        }

        if let Some(concurrency) = args.concurrency {
            self.general.concurrency = concurrency;
        }

        if args.save_data {
            self.report.save_data = true;
        }
    }

    /// Check values that cannot be expressed in the type system.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            anyhow::bail!("model.temperature must be between 0.0 and 2.0");
        }
        if self.general.concurrency == 0 {
            anyhow::bail!("general.concurrency must be at least 1");
        }
        if self.model.timeout_seconds == 0 {
            anyhow::bail!("model.timeout_seconds must be at least 1");
        }
        for (name, url) in [
            ("model.base_url", &self.model.base_url),
            ("sources.fred_url", &self.sources.fred_url),
            ("sources.alpha_vantage_url", &self.sources.alpha_vantage_url),
            ("sources.yahoo_url", &self.sources.yahoo_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with 'http://' or 'https://'", name);
            }
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
