//! Crawler coordinator - main crawl orchestration logic
//!
//! This module fans the date range out into one task per day. All day tasks
//! share:
//! - one `PageFetcher`, and through it one transport session and one
//!   concurrency limiter
//! - one `RecordSink` feeding the single output writer
//!
//! Inside a day, categories are crawled in their fixed order and each
//! category's pages one after another; entries are written as they are found.

use crate::archive::{category_urls, DateRange, Day};
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, HttpTransport, PageFetcher};
use crate::crawler::pagination::DayPages;
use crate::crawler::parser::extract_entries;
use crate::output::{
    format_report, serialize, CrawlReport, DayFailure, RecordSink, RecordWriter,
    DEFAULT_QUEUE_CAPACITY,
};
use crate::{CrawlerError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: PageFetcher,
    site_root: Arc<Url>,
    days: DateRange,
    output_path: PathBuf,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    ///
    /// The end day defaults to today; it is never crawled itself.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError)` - A bound is not a calendar date, the site URL is
    ///   invalid, or the HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let end_day = match &config.crawler.end_day {
            Some(day) => day.clone(),
            None => Day::today().to_string(),
        };
        let days = DateRange::new(&config.crawler.start_day, &end_day)?;
        let site_root = Url::parse(&config.http.site_url)?;

        let client = build_http_client(
            &config.http,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;
        let limiter = Arc::new(Semaphore::new(config.crawler.concurrency as usize));
        let fetcher = PageFetcher::new(
            Arc::new(HttpTransport::new(client)),
            limiter,
            config.crawler.max_retries,
        );

        Ok(Self::from_parts(
            fetcher,
            site_root,
            days,
            PathBuf::from(&config.output.output_file),
        ))
    }

    /// Assembles a coordinator around an existing fetcher
    pub fn from_parts(
        fetcher: PageFetcher,
        site_root: Url,
        days: DateRange,
        output_path: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            site_root: Arc::new(site_root),
            days,
            output_path,
        }
    }

    pub fn days(&self) -> &DateRange {
        &self.days
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Runs the crawl over the whole date range
    ///
    /// Every day task runs to completion; a failing day does not stop its
    /// siblings. The output file is truncated once, up front.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Every day completed
    /// * `Err(CrawlerError)` - The first day failure observed (the full
    ///   report is logged before returning), or an output error
    pub async fn run(&self) -> Result<CrawlReport> {
        tracing::info!(
            "Starting crawl of {} days ({} .. {}) into {}",
            self.days.len(),
            self.days.first().map(|d| d.to_string()).unwrap_or_default(),
            self.days.last().map(|d| d.to_string()).unwrap_or_default(),
            self.output_path.display()
        );

        let (sink, writer) = RecordWriter::create(&self.output_path, DEFAULT_QUEUE_CAPACITY).await?;

        let mut tasks = JoinSet::new();
        for day in self.days.iter() {
            let fetcher = self.fetcher.clone();
            let site_root = Arc::clone(&self.site_root);
            let sink = sink.clone();
            tasks.spawn(async move {
                let result = crawl_day(&day, &fetcher, &site_root, &sink).await;
                (day, result)
            });
        }
        // The writer finishes once the last day task drops its clone
        drop(sink);

        let mut report = CrawlReport::new(self.days.len() as u64);
        let mut first_error = None;

        while let Some(joined) = tasks.join_next().await {
            let (day, result) = match joined {
                Ok((day, result)) => (day.to_string(), result),
                Err(e) => (
                    "<unknown>".to_string(),
                    Err(CrawlerError::Task(e.to_string())),
                ),
            };

            match result {
                Ok(records) => {
                    report.days_completed += 1;
                    tracing::info!(
                        "Day {} done: {} records. Tasks remain: {}",
                        day,
                        records,
                        tasks.len()
                    );
                }
                Err(e) => {
                    tracing::error!("Day {} failed: {}", day, e);
                    report.failed_days.push(DayFailure {
                        day,
                        error: e.to_string(),
                    });
                    first_error.get_or_insert(e);
                }
            }
        }

        report.records_written = writer.finish().await?;

        tracing::info!(
            "Crawl finished: {}/{} days completed, {} failed, {} records written",
            report.days_completed,
            report.days_total,
            report.days_failed(),
            report.records_written
        );

        match first_error {
            Some(e) => {
                tracing::info!("Crawl incomplete\n{}", format_report(&report));
                Err(e)
            }
            None => Ok(report),
        }
    }
}

/// Crawls every category of one day, streaming records into `sink`
///
/// # Returns
///
/// The number of records produced for the day.
pub async fn crawl_day(
    day: &Day,
    fetcher: &PageFetcher,
    site_root: &Url,
    sink: &RecordSink,
) -> Result<u64> {
    let mut records = 0;

    for target in category_urls(day.as_str(), site_root)? {
        tracing::debug!("Crawling {} for {}", target.category, day);

        let mut pages = DayPages::new(fetcher, target.url, site_root);
        while let Some(page) = pages.next_page().await {
            let page = page?;
            let entries = extract_entries(&page)?;
            tracing::debug!("Parsed {} entries from {}", entries.len(), page.url);

            for entry in &entries {
                sink.send(serialize(entry)).await?;
                records += 1;
            }
        }
    }

    Ok(records)
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use anekdot_crawler::config::load_config;
/// use anekdot_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawler.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} records", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
