//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Command-line flags are layered on top by the binary before validation.
//!
//! # Example
//!
//! ```no_run
//! use anekdot_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling from {}", config.crawler.start_day);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_SITE_URL, DEFAULT_START_DAY,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
