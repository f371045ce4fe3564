//! Per-run crawl report
//!
//! Day tasks fail independently, so the orchestrator tallies their outcomes
//! into a [`CrawlReport`] instead of reporting only the first error.

/// One day task that ended in an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFailure {
    pub day: String,
    pub error: String,
}

/// Outcome of a whole crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Days scheduled
    pub days_total: u64,

    /// Days whose task finished without error
    pub days_completed: u64,

    /// Days whose task failed, in completion order
    pub failed_days: Vec<DayFailure>,

    /// Records accepted by the output writer
    pub records_written: u64,
}

impl CrawlReport {
    pub fn new(days_total: u64) -> Self {
        Self {
            days_total,
            ..Self::default()
        }
    }

    pub fn days_failed(&self) -> u64 {
        self.failed_days.len() as u64
    }

    pub fn is_success(&self) -> bool {
        self.failed_days.is_empty()
    }

    /// Completed days as a percentage of scheduled days
    pub fn completion_rate(&self) -> f64 {
        if self.days_total == 0 {
            return 0.0;
        }
        (self.days_completed as f64 / self.days_total as f64) * 100.0
    }
}

/// Formats a report for terminal output
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Report ===\n\n");
    out.push_str(&format!("  Days scheduled: {}\n", report.days_total));
    out.push_str(&format!(
        "  Days completed: {} ({:.1}%)\n",
        report.days_completed,
        report.completion_rate()
    ));
    out.push_str(&format!("  Days failed: {}\n", report.days_failed()));
    out.push_str(&format!("  Records written: {}\n", report.records_written));

    if !report.failed_days.is_empty() {
        out.push_str(&format!("\nFailed Days ({}):\n", report.failed_days.len()));
        for failure in &report.failed_days {
            out.push_str(&format!("  - {}: {}\n", failure.day, failure.error));
        }
    }

    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
