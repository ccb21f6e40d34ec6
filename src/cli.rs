//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::ReasonCounting;
use crate::catalog::SortOrder;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Graveyard - failure analytics for startup teardowns
///
/// Load a collection of startup failure case studies, cluster their
/// failure reasons and produce a Markdown or JSON trends report.
///
/// Examples:
///   graveyard --input teardowns.json
///   graveyard --input data/ --tag saas --format json -o -
///   graveyard --remote --api-url https://project.supabase.co
///   graveyard --input teardowns.json --list-tags
///   graveyard --input data/ --show quibi
///   graveyard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file or directory of JSON files holding teardown records
    #[arg(
        short,
        long,
        value_name = "PATH",
        required_unless_present_any = ["remote", "init_config"],
        conflicts_with = "remote"
    )]
    pub input: Option<PathBuf>,

    /// Fetch records from the hosted data API instead of local files
    #[arg(long)]
    pub remote: bool,

    /// Base URL of the hosted data API
    #[arg(long, value_name = "URL", env = "GRAVEYARD_API_URL")]
    pub api_url: Option<String>,

    /// API key for the hosted data API
    #[arg(long, value_name = "KEY", env = "GRAVEYARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output file path for the report ("-" writes to stdout)
    ///
    /// Defaults to the config value or graveyard_report.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Only include records whose name, market or description contains TEXT
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Only include records carrying this exact tag
    #[arg(short, long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Order of records before analysis (name, market, duration, newest)
    #[arg(long, value_name = "ORDER")]
    pub sort: Option<SortOrder>,

    /// How to count duplicate failure reasons within one record
    #[arg(long, value_name = "MODE")]
    pub counting: Option<CountingArg>,

    /// Print every distinct tag in the collection and exit
    #[arg(long)]
    pub list_tags: bool,

    /// Print a single teardown as JSON and exit
    #[arg(long, value_name = "ID", conflicts_with = "list_tags")]
    pub show: Option<String>,

    /// Report heading (overrides the config file)
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Period shown under the heading (default: current month and year)
    #[arg(long, value_name = "TEXT")]
    pub period: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .graveyard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when no records remain after filtering
    #[arg(long)]
    pub fail_if_empty: bool,

    /// Generate a default .graveyard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Reason counting mode for --counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CountingArg {
    PerRecord,
    PerOccurrence,
}

impl From<CountingArg> for ReasonCounting {
    fn from(arg: CountingArg) -> Self {
        match arg {
            CountingArg::PerRecord => ReasonCounting::PerRecord,
            CountingArg::PerOccurrence => ReasonCounting::PerOccurrence,
        }
    }
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

        if self.input.is_none() && !self.remote {
            return Err("Either --input or --remote is required".to_string());
        }

        // Validate input path if provided
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input path does not exist: {}", input.display()));
            }
        }

        // Validate API URL format
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref tag) = self.tag {
            if tag.trim().is_empty() {
                return Err("Tag filter must not be empty".to_string());
            }
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
