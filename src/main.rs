//! Graveyard - failure analytics for startup teardowns
//!
//! A CLI tool that loads a collection of startup failure case studies,
//! clusters their failure reasons and generates a trends report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable input, API failure, bad config, etc.)
//!   2 - No records left after filtering and --fail-if-empty was set

mod analysis;
mod catalog;
mod cli;
mod config;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use catalog::CatalogFilter;
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata, TeardownRecord};
use std::time::{Duration, Instant};
use store::{FileStore, RecordStore, RestStore};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Graveyard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .graveyard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the data API, counting mode and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete load, analyze and report workflow. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Build the record store
    let store = build_store(&args, &config)?;
    info!("Loading teardowns from {}", store.describe());

    if let Some(ref id) = args.show {
        let record = store
            .fetch_teardown(id)
            .await
            .with_context(|| format!("Failed to load teardown {}", id))?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(0);
    }

    // Step 2: Fetch records
    let records = fetch_records(store.as_ref(), args.remote && !args.quiet).await?;
    info!("Loaded {} teardowns", records.len());

    if args.list_tags {
        for tag in catalog::all_tags(&records) {
            println!("{}", tag);
        }
        return Ok(0);
    }

    // Step 3: Apply catalog filtering
    let filter = CatalogFilter {
        search: args.search.clone(),
        tag: args.tag.clone(),
    };
    let selected = catalog::select(&records, &filter, args.sort);
    if !filter.is_empty() {
        info!(
            "{} of {} teardowns match the filter",
            selected.len(),
            records.len()
        );
    }

    if selected.is_empty() {
        warn!("No teardowns to analyze");
        if args.fail_if_empty {
            eprintln!("\n⛔ No teardowns matched. Failing (exit code 2).");
            return Ok(2);
        }
    }

    // Step 4: Compute analytics
    let options = analysis::AnalysisOptions::from(&config.analysis);
    debug!("Analysis options: {:?}", options);
    let analytics = analysis::compute_analytics_with(&selected, &options);

    // Step 5: Build and render the report
    let report = Report {
        metadata: ReportMetadata {
            source: store.describe(),
            period: args
                .period
                .clone()
                .unwrap_or_else(|| Utc::now().format("%B %Y").to_string()),
            generated_at: Utc::now(),
            records_analyzed: selected.len(),
            records_total: records.len(),
        },
        analytics,
    };

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let destination = config.general.output.as_str();
    if destination == "-" {
        println!("{}", output);
        return Ok(0);
    }

    std::fs::write(destination, &output)
        .with_context(|| format!("Failed to write report to {}", destination))?;

    if !args.quiet {
        print_summary(&report, start_time.elapsed());
        println!("\n✅ Report saved to: {}", destination);
    }

    Ok(0)
}

/// Pick the record store for this run.
fn build_store(args: &Args, config: &Config) -> Result<Box<dyn RecordStore>> {
    if let Some(ref input) = args.input {
        return Ok(Box::new(FileStore::new(input)));
    }

    let rest = RestStore::from_config(&config.source)
        .context("Cannot use --remote; set [source] api_url and api_key")?;
    Ok(Box::new(rest))
}

/// Fetch all records, with a spinner for slow remote sources.
async fn fetch_records(store: &dyn RecordStore, show_progress: bool) -> Result<Vec<TeardownRecord>> {
    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Fetching teardowns...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = store.fetch_teardowns().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result.with_context(|| format!("Failed to load teardowns from {}", store.describe()))
}

/// Print a short console summary of the report.
fn print_summary(report: &Report, elapsed: Duration) {
    let analytics = &report.analytics;

    println!("\n📊 Analytics Summary:");
    println!(
        "   Teardowns analyzed: {} (of {})",
        report.metadata.records_analyzed, report.metadata.records_total
    );
    if let Some(top) = analytics.top_failure_reasons.first() {
        println!("   Top failure reason: {} ({}%)", top.reason, top.percentage);
    }
    println!("   Industries: {}", analytics.industry_breakdown.len());
    println!("   Funding ranges: {}", analytics.revenue_range_analysis.len());
    println!("   Duration: {:.2}s", elapsed.as_secs_f64());
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
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
