use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use chrono::NaiveDate;
use url::Url;

/// Upper bound on simultaneous fetch attempts
const MAX_CONCURRENCY: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl range and request discipline
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    let start = parse_calendar_day("start-day", &config.start_day)?;
    if let Some(end_day) = &config.end_day {
        let end = parse_calendar_day("end-day", end_day)?;
        if end <= start {
            return Err(ConfigError::Validation(format!(
                "end-day ({}) must be after start-day ({})",
                end_day, config.start_day
            )));
        }
    }

    Ok(())
}

fn parse_calendar_day(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        ConfigError::Validation(format!("{} '{}' is not a calendar date: {}", field, value, e))
    })
}

/// Validates transport settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.site_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "site-url must use http or https, got '{}'",
            config.site_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "site-url has no host: '{}'",
            config.site_url
        )));
    }

    // Relative joins drop the last path segment otherwise
    if !url.path().ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "site-url must end with '/', got '{}'",
            config.site_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output-file is required".to_string(),
        ));
    }

    if let Some(logs_dir) = &config.logs_dir {
        if logs_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logs-dir cannot be empty when given".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.output.output_file = "records.txt".to_string();
        config
    }

    #[test]
    fn test_default_config_with_output_is_valid() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_output_file() {
        let config = Config::default();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = valid_config();
        config.crawler.concurrency = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excessive_concurrency() {
        let mut config = valid_config();
        config.crawler.concurrency = MAX_CONCURRENCY + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = valid_config();
        config.crawler.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_pattern_valid_but_not_a_date() {
        let mut config = valid_config();
        config.crawler.start_day = "2020-13-45".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_end_before_start() {
        let mut config = valid_config();
        config.crawler.start_day = "2020-01-10".to_string();
        config.crawler.end_day = Some("2020-01-10".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_explicit_range() {
        let mut config = valid_config();
        config.crawler.start_day = "2020-01-10".to_string();
        config.crawler.end_day = Some("2020-01-11".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_site_url_must_be_http() {
        let mut config = valid_config();
        config.http.site_url = "ftp://www.anekdot.ru/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_site_url_needs_trailing_slash() {
        let mut config = valid_config();
        config.http.site_url = "https://www.anekdot.ru/mirror".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_site_url_garbage() {
        let mut config = valid_config();
        config.http.site_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = valid_config();
        config.http.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }
}
