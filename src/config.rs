//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.graveyard.toml` files.

use crate::analysis::ReasonCounting;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".graveyard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Remote record source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Analytics settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

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

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            format: OutputFormat::default(),
        }
    }
}

fn default_output() -> String {
    "graveyard_report.md".to_string()
}

/// Hosted data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the hosted backend (without the `/rest/v1` suffix).
    #[serde(default)]
    pub api_url: Option<String>,

    /// Public API key. Falls back to the GRAVEYARD_API_KEY env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Table holding the teardowns.
    #[serde(default = "default_table")]
    pub table: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Only fetch rows whose status is "published".
    #[serde(default = "default_true")]
    pub published_only: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            table: default_table(),
            timeout_seconds: default_timeout(),
            published_only: true,
        }
    }
}

fn default_table() -> String {
    "teardowns".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Analytics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Count duplicate normalized reasons once per record or per occurrence.
    #[serde(default)]
    pub reason_counting: ReasonCounting,

    /// Entries in the top failure reasons section.
    #[serde(default = "default_max_top_reasons")]
    pub max_top_reasons: usize,

    /// Example names kept per group.
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reason_counting: ReasonCounting::default(),
            max_top_reasons: default_max_top_reasons(),
            max_examples: default_max_examples(),
        }
    }
}

fn default_max_top_reasons() -> usize {
    10
}

fn default_max_examples() -> usize {
    3
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Failure reasons listed in the Markdown "most common causes" section.
    #[serde(default = "default_top_reasons_in_report")]
    pub top_reasons_in_report: usize,

    /// Include the red flags section.
    #[serde(default = "default_true")]
    pub include_red_flags: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            top_reasons_in_report: default_top_reasons_in_report(),
            include_red_flags: true,
        }
    }
}

fn default_title() -> String {
    "Startup Graveyard Trends Report".to_string()
}

fn default_top_reasons_in_report() -> usize {
    5
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
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(ref url) = args.api_url {
            self.source.api_url = Some(url.clone());
        }
        if let Some(ref key) = args.api_key {
            self.source.api_key = Some(key.clone());
        }

        if let Some(counting) = args.counting {
            self.analysis.reason_counting = counting.into();
        }

        if let Some(ref title) = args.title {
            self.report.title = title.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
