use serde::Deserialize;

/// First day of the site's daily release archive
pub const DEFAULT_START_DAY: &str = "1995-11-08";

/// Root of the site; pagination links are resolved against it
pub const DEFAULT_SITE_URL: &str = "https://www.anekdot.ru/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like \
     Gecko) Ubuntu Chromium/80.0.3987.87 Chrome/80.0.3987.87 Safari/537.36";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawl range and request discipline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First day to crawl (inclusive), `YYYY-MM-DD`
    #[serde(rename = "start-day")]
    pub start_day: String,

    /// Day to stop at (exclusive), `YYYY-MM-DD`; today when absent
    #[serde(rename = "end-day")]
    pub end_day: Option<String>,

    /// Maximum number of in-flight fetch attempts across all days
    pub concurrency: u32,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a timed-out request
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_day: DEFAULT_START_DAY.to_string(),
            end_day: None,
            concurrency: 10,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// Transport session settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Site root used to build day URLs and resolve pagination links
    #[serde(rename = "site-url")]
    pub site_url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the records file (truncated at crawl start)
    #[serde(rename = "output-file")]
    pub output_file: String,

    /// Directory receiving `crawler.log`
    #[serde(rename = "logs-dir")]
    pub logs_dir: Option<String>,
}
