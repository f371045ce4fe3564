//! Daily archive addressing
//!
//! This module knows how the site lays out its release archive:
//! - `Day`: the canonical `YYYY-MM-DD` day string and its lightweight format check
//! - `DateRange`: the lazy, restartable sequence of days to crawl
//! - `Category`: the closed set of content categories and the per-day URL builder

mod category;
mod day;

pub use category::{category_urls, Category, CategoryUrl};
pub use day::{matches_day_pattern, DateRange, Day, Days, DAY_FORMAT};
