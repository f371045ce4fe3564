//! Output module for crawl results
//!
//! This module handles:
//! - Normalizing entry text and rendering records
//! - Owning the output file on behalf of all day tasks
//! - Summarizing per-day outcomes of a crawl

pub mod record;
mod report;
mod writer;

pub use record::{normalize, serialize, END_OF_DIALOG, END_OF_UTTERANCE};
pub use report::{format_report, print_report, CrawlReport, DayFailure};
pub use writer::{RecordSink, RecordWriter, DEFAULT_QUEUE_CAPACITY};
