//! Anekdot crawler main entry point
//!
//! This is the command-line interface for the daily archive crawler.

use anekdot_crawler::archive::category_urls;
use anekdot_crawler::config::{load_config_with_hash, validate, Config};
use anekdot_crawler::crawler::{crawl, Coordinator};
use anekdot_crawler::output::print_report;
use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Name of the log file written inside the logs directory
const LOG_FILE_NAME: &str = "crawler.log";

/// Anekdot crawler: harvests the daily release archive
///
/// Walks every day from the start day up to (not including) the end day,
/// crawls each category's archive pages and appends the extracted posts to
/// the output file as dialog records. Flags override values from --config.
#[derive(Parser, Debug)]
#[command(name = "anekdot-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Begins anekdot.ru crawling", long_about = None)]
struct Cli {
    /// Output file, where all parsed content will be saved
    #[arg(long, alias = "output_file", value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Logs directory [file logging is off when omitted]
    #[arg(long, alias = "logs_dir", value_name = "DIR")]
    logs_dir: Option<PathBuf>,

    /// Requests timeout, s [default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of simultaneous requests [default: 10]
    #[arg(long)]
    concurrency: Option<u32>,

    /// Number of retries if timeout was occurred [default: 3]
    #[arg(long, alias = "n_retries")]
    n_retries: Option<u32>,

    /// First day to crawl, YYYY-MM-DD [default: 1995-11-08]
    #[arg(long)]
    start_day: Option<String>,

    /// Day to stop at (exclusive), YYYY-MM-DD [default: today]
    #[arg(long)]
    end_day: Option<String>,

    /// Site root the archive URLs are built from [default: https://www.anekdot.ru/]
    #[arg(long)]
    site_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    let logs_dir = match (&config.output.logs_dir, cli.dry_run) {
        (Some(dir), false) => {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create logs directory {}", dir.display()))?;
            Some(dir)
        }
        _ => None,
    };
    setup_logging(cli.verbose, cli.quiet, logs_dir.as_deref())?;

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Layers command-line flags over file (or default) settings
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.output_file {
        config.output.output_file = path.to_string_lossy().into_owned();
    }
    if let Some(dir) = &cli.logs_dir {
        config.output.logs_dir = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(retries) = cli.n_retries {
        config.crawler.max_retries = retries;
    }
    if let Some(day) = &cli.start_day {
        config.crawler.start_day = day.clone();
    }
    if let Some(day) = &cli.end_day {
        config.crawler.end_day = Some(day.clone());
    }
    if let Some(url) = &cli.site_url {
        config.http.site_url = url.clone();
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Events go to stderr, and additionally to `<logs_dir>/crawler.log` when a
/// logs directory is configured.
fn setup_logging(verbose: u8, quiet: bool, logs_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("anekdot_crawler=info,warn"),
            1 => EnvFilter::new("anekdot_crawler=debug,info"),
            2 => EnvFilter::new("anekdot_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match logs_dir {
        Some(dir) => {
            let path = dir.join(LOG_FILE_NAME);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let days = coordinator.days();

    println!("=== Anekdot Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!(
        "  Attempts per page: {}",
        config.crawler.max_retries.saturating_add(1)
    );

    println!("\nDate Range:");
    match (days.first(), days.last()) {
        (Some(first), Some(last)) => {
            println!("  {} .. {} ({} days)", first, last, days.len());
        }
        _ => println!("  (empty)"),
    }

    println!("\nOutput:");
    println!("  Records: {}", config.output.output_file);
    if let Some(dir) = &config.output.logs_dir {
        println!("  Logs: {}/{}", dir, LOG_FILE_NAME);
    }

    if let Some(first) = days.first() {
        let site_root = Url::parse(&config.http.site_url)?;
        println!("\nFirst Day URLs:");
        for target in category_urls(first.as_str(), &site_root)? {
            println!("  - {}", target.url);
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let output_path = Path::new(&config.output.output_file);
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    match crawl(config).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
