//! Anekdot crawler: a daily archive harvester
//!
//! This crate walks the daily release archive of a categorized short-text site,
//! follows each day's pagination, extracts tagged entries and streams them as
//! line-oriented dialog records into a single output file.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod document;
pub mod output;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Incorrect day format: {day}. Must match YYYY-MM-DD")]
    DayFormat { day: String },

    #[error("Invalid calendar date '{value}': {source}")]
    DateParse {
        value: String,
        source: chrono::ParseError,
    },

    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    #[error("Request for {url} timed out on all {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("Malformed page {url}: {message}")]
    MalformedPage { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Output writer is closed")]
    OutputClosed,

    #[error("Crawl task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use archive::{Category, DateRange, Day};
pub use config::Config;
pub use crawler::{crawl, Entry};
pub use output::CrawlReport;
