//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the shared HTTP client with an explicit user agent and timeout
//! - The `Transport` seam between the fetcher and the concrete client
//! - Bounded-concurrency fetching with timeout retry

use crate::config::HttpConfig;
use crate::{CrawlerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Failure of a single transport attempt
#[derive(Debug, Error)]
pub enum TransportError {
    /// The attempt hit the request timeout; retryable
    #[error("request timed out")]
    Timeout,

    /// Any other transport failure; not retried
    #[error("{0}")]
    Other(String),
}

/// Something that can GET a URL and return its body as text
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, url: &str) -> std::result::Result<String, TransportError>;
}

/// `reqwest`-backed transport session
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> std::result::Result<String, TransportError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            // The body is still parsed: archive days without posts may not answer 200
            tracing::warn!("HTTP {} for page: {}", status.as_u16(), url);
        }

        response.text().await.map_err(classify)
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Other(error.to_string())
    }
}

/// Builds the HTTP client shared by every day task
///
/// The timeout bounds one attempt, including reading the response body.
///
/// # Arguments
///
/// * `config` - Transport settings carrying the user agent
/// * `timeout` - Per-attempt request timeout
///
/// # Example
///
/// ```no_run
/// use anekdot_crawler::config::HttpConfig;
/// use anekdot_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&HttpConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Bounded, retried page fetcher
///
/// Every attempt takes one permit from the shared limiter and gives it back
/// when the attempt ends, so a page waiting to retry does not hold a slot.
/// Only timeouts are retried; after `max_retries + 1` timed-out attempts the
/// fetch fails with `CrawlerError::RetriesExhausted`.
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    limiter: Arc<Semaphore>,
    max_retries: u32,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn Transport>, limiter: Arc<Semaphore>, max_retries: u32) -> Self {
        Self {
            transport,
            limiter,
            max_retries,
        }
    }

    /// Total attempts a single fetch may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Requests a page and returns its content
    ///
    /// # Errors
    ///
    /// * `CrawlerError::RetriesExhausted` - every attempt timed out
    /// * `CrawlerError::Http` - a non-timeout transport failure, raised on first occurrence
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let attempts = self.max_attempts();

        for attempt in 1..=attempts {
            tracing::debug!("Requesting page [{}/{}]: {}", attempt, attempts, url);

            let outcome = {
                let _permit = self
                    .limiter
                    .acquire()
                    .await
                    .map_err(|_| CrawlerError::Task("concurrency limiter closed".to_string()))?;
                self.transport.get_text(url).await
            };

            match outcome {
                Ok(body) => {
                    tracing::debug!("Page source obtained: {}", url);
                    return Ok(body);
                }
                Err(TransportError::Timeout) => {
                    tracing::warn!("Timeout for page [{}/{}]: {}", attempt, attempts, url);
                }
                Err(TransportError::Other(message)) => {
                    return Err(CrawlerError::Http {
                        url: url.to_string(),
                        message,
                    });
                }
            }
        }

        Err(CrawlerError::RetriesExhausted {
            url: url.to_string(),
            attempts,
        })
    }
}
