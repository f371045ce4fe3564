//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the archive site and run full
//! day crawls and fetches over real HTTP.

use anekdot_crawler::config::{parse_config, validate, Config};
use anekdot_crawler::crawler::{crawl, HttpTransport, PageFetcher};
use anekdot_crawler::CrawlerError;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DAY: &str = "2020-01-01";

/// Creates a one-day test configuration against the given site root
fn create_test_config(site_url: &str, output_file: &str) -> Config {
    let mut config = Config::default();
    config.crawler.start_day = DAY.to_string();
    config.crawler.end_day = Some("2020-01-02".to_string());
    config.crawler.concurrency = 2;
    config.crawler.timeout_secs = 5;
    config.crawler.max_retries = 1;
    config.http.site_url = site_url.to_string();
    config.output.output_file = output_file.to_string();
    validate(&config).expect("test config should be valid");
    config
}

fn archive_page(category: &str, body: &str) -> String {
    format!(
        r#"<html><head>
        <link rel="canonical" href="https://www.anekdot.ru/release/{}/day/{}/">
        </head><body>{}</body></html>"#,
        category, DAY, body
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, url_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_day_crawl_with_pagination() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("records.txt");

    // First anekdot page links to page two three times over
    mount_page(
        &server,
        "/release/anekdot/day/2020-01-01/",
        archive_page(
            "anekdot",
            r#"
            <div class="topicbox" id="11">
                <div class="text">Knock knock.<br>Who is there?</div>
                <div class="tags"><a href="/tags/door">door</a></div>
            </div>
            <div class="pageslist">
                <a href="/release/anekdot/day/2020-01-01/2">2</a>
                <a href="release/anekdot/day/2020-01-01/2">2</a>
                <a href="/release/anekdot/day/2020-01-01/2">next</a>
            </div>
            "#,
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/release/anekdot/day/2020-01-01/2"))
        .respond_with(html(archive_page(
            "anekdot",
            r#"<div class="topicbox" id="12"><div class="text">  Second   page  </div></div>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/release/story/day/2020-01-01/",
        archive_page(
            "story",
            r#"
            <div class="topicbox" id="21">
                <div class="text">A long
                    story</div>
                <div class="tags"><a href="/t/1">life</a><a href="/t/2">work</a></div>
            </div>
            "#,
        ),
    )
    .await;

    // No entries at all for aphorisms
    mount_page(
        &server,
        "/release/aphorism/day/2020-01-01/",
        "<html><body><p>empty</p></body></html>".to_string(),
    )
    .await;

    mount_page(
        &server,
        "/release/poems/day/2020-01-01/",
        archive_page(
            "poems",
            r#"<div class="topicbox" id="41"><div class="text">Roses<br>are red</div></div>
               <div class="topicbox"><div class="text">not a post</div></div>"#,
        ),
    )
    .await;

    let config = create_test_config(
        &format!("{}/", server.uri()),
        output.to_str().unwrap(),
    );
    let report = crawl(&config).await.expect("crawl should succeed");

    assert_eq!(report.days_total, 1);
    assert_eq!(report.days_completed, 1);
    assert_eq!(report.records_written, 4);

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "anekdot, door\n<EOU>\nKnock knock. Who is there?\n<EOD>\n\
         anekdot\n<EOU>\nSecond page\n<EOD>\n\
         story, life, work\n<EOU>\nA long story\n<EOD>\n\
         poems\n<EOU>\nRoses are red\n<EOD>\n"
    );
}

#[tokio::test]
async fn test_missing_archive_pages_yield_no_records() {
    // Every request falls through to wiremock's default 404
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("records.txt");

    let config = create_test_config(
        &format!("{}/", server.uri()),
        output.to_str().unwrap(),
    );
    let report = crawl(&config).await.unwrap();

    assert_eq!(report.days_completed, 1);
    assert_eq!(report.records_written, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}

#[tokio::test]
async fn test_malformed_page_fails_the_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("records.txt");

    // Entries but no canonical link
    mount_page(
        &server,
        "/release/anekdot/day/2020-01-01/",
        r#"<html><body><div class="topicbox" id="1"><div class="text">x</div></div></body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(
        &format!("{}/", server.uri()),
        output.to_str().unwrap(),
    );
    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, CrawlerError::MalformedPage { .. }));
}

#[tokio::test]
async fn test_connection_failure_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("records.txt");

    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1/", output.to_str().unwrap());
    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, CrawlerError::Http { .. }));
}

#[tokio::test]
async fn test_config_file_drives_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("records.txt");

    mount_page(
        &server,
        "/release/story/day/2020-01-01/",
        archive_page(
            "story",
            r#"<div class="topicbox" id="5"><div class="text">From config</div></div>"#,
        ),
    )
    .await;

    let toml = format!(
        r#"
[crawler]
start-day = "2020-01-01"
end-day = "2020-01-02"
concurrency = 1
timeout-secs = 5

[http]
site-url = "{}/"
user-agent = "TestBot/1.0"

[output]
output-file = "{}"
"#,
        server.uri(),
        output.display()
    );
    let config = parse_config(&toml).unwrap();
    validate(&config).unwrap();

    let report = crawl(&config).await.unwrap();
    assert_eq!(report.records_written, 1);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "story\n<EOU>\nFrom config\n<EOD>\n"
    );
}

fn fast_timeout_fetcher(max_retries: u32) -> PageFetcher {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    PageFetcher::new(
        Arc::new(HttpTransport::new(client)),
        Arc::new(Semaphore::new(1)),
        max_retries,
    )
}

#[tokio::test]
async fn test_timeouts_retried_until_success() {
    let server = MockServer::start().await;

    // The first two answers arrive after the client has given up
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fast_timeout_fetcher(2);
    let body = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "finally");
}

#[tokio::test]
async fn test_timeouts_exhaust_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = fast_timeout_fetcher(2);
    let err = fetcher
        .fetch(&format!("{}/never", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CrawlerError::RetriesExhausted { attempts: 3, .. }
    ));
}
