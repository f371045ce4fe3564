//! Crawler module for archive fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - Bounded-concurrency page fetching with timeout retry
//! - Pagination discovery from a category's first page
//! - Entry extraction from archive pages
//! - Day-task orchestration over the date range

mod coordinator;
mod fetcher;
mod pagination;
mod parser;

pub use coordinator::{crawl_day, run_crawl, Coordinator};
pub use fetcher::{build_http_client, HttpTransport, PageFetcher, Transport, TransportError};
pub use pagination::{pagination_links, DayPages, Page, PAGINATION_CLASS};
pub use parser::{
    category_from_canonical, extract_entries, parse_entries, Entry, ENTRY_CLASS, TAGS_CLASS,
    TEXT_CLASS,
};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the date range and the shared HTTP client
/// 2. Open the output file behind a single writer task
/// 3. Spawn one task per day under a shared concurrency limit
/// 4. Wait for every day and report the outcome
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Every day completed
/// * `Err(CrawlerError)` - At least one day failed, or the output failed
pub async fn crawl(config: &Config) -> Result<CrawlReport, CrawlerError> {
    run_crawl(config).await
}
