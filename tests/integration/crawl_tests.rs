//! Integration tests for the batch crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, with every pacing delay set to zero.

use std::path::{Path, PathBuf};
use stellenwerk_crawler::config::{Config, OutputConfig, PacingConfig, SiteConfig};
use stellenwerk_crawler::crawler::{crawl, BatchCrawler, ListingScanner};
use stellenwerk_crawler::{CrawlPhase, ListingLink, SENTINEL};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(
    server_uri: &str,
    output_dir: &Path,
    batch_size: u32,
    max_pages: u32,
) -> Config {
    Config {
        site: SiteConfig {
            base_url: format!("{}/hamburg", server_uri),
            host: server_uri.to_string(),
            ..SiteConfig::default()
        },
        http: Default::default(),
        pacing: PacingConfig::immediate(batch_size, max_pages),
        output: OutputConfig {
            directory: output_dir.to_path_buf(),
            file_prefix: "stellenwerk_jobs".to_string(),
        },
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_index(server: &MockServer, offset: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/hamburg"))
        .and(query_param("pagination[start]", offset))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .mount(server)
        .await;
}

fn sorted_csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Failed to read output dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_full_crawl_two_batches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    // Page 1: duplicate link, an account link, and a listing that 404s
    mount_index(
        &mock_server,
        "0",
        r#"
        <a href="/hamburg/jobs/1">Lagerhilfe</a>
        <a href="/hamburg/jobs/1">Lagerhilfe (mehr)</a>
        <a href="/hamburg/account/x">Mein Konto</a>
        <a href="/hamburg/jobs/2">Verschwunden</a>
        "#,
    )
    .await;
    // Page 2: one more listing
    mount_index(&mock_server, "10", r#"<a href="/hamburg/jobs/3">Tutor</a>"#).await;
    // Page 3: end of results
    mount_index(&mock_server, "20", "<p>Keine weiteren Jobs</p>").await;

    mount_page(
        &mock_server,
        "/hamburg/jobs/1",
        html_page(
            r#"
            <h1>Lagerhilfe (m/w/d)</h1>
            <div class="company-name">Hafen Logistik GmbH</div>
            <span class="job-location">Hamburg-Waltershof</span>
            <span class="salary">14 € / Stunde</span>
            <span class="posting-date">02.01.2024</span>
            <a href="/hamburg/jobs/1/aufgaben">Dein Job</a>
            <a href="/hamburg/jobs/1/profil">Dein Profil</a>
            "#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/hamburg/jobs/1/aufgaben",
        html_page(r#"<div class="job-description"><p>Regale auffüllen</p></div>"#),
    )
    .await;
    mount_page(
        &mock_server,
        "/hamburg/jobs/1/profil",
        ResponseTemplate::new(500),
    )
    .await;
    mount_page(&mock_server, "/hamburg/jobs/2", ResponseTemplate::new(404)).await;
    mount_page(
        &mock_server,
        "/hamburg/jobs/3",
        html_page("<h1>Nachhilfe Mathe</h1>"),
    )
    .await;

    let config = create_test_config(&base_url, output.path(), 1, 10);
    let mut crawler = BatchCrawler::from_config(&config).expect("Failed to create crawler");
    let records = crawler.run(config.pacing.max_pages).await;

    // Records arrive in crawl order; the 404 listing is skipped
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.title, "Lagerhilfe (m/w/d)");
    assert_eq!(first.company, "Hafen Logistik GmbH");
    assert_eq!(first.location, "Hamburg-Waltershof");
    assert_eq!(first.salary, "14 € / Stunde");
    assert_eq!(first.posted_date, "02.01.2024");
    assert_eq!(first.url, format!("{}/hamburg/jobs/1", base_url));
    assert_eq!(first.dein_job, "Regale auffüllen");
    // sub-page failure only affects its own field
    assert_eq!(first.dein_profil, SENTINEL);

    let second = &records[1];
    assert_eq!(second.title, "Nachhilfe Mathe");
    assert_eq!(second.company, SENTINEL);
    assert_eq!(second.url, format!("{}/hamburg/jobs/3", base_url));

    assert_eq!(crawler.phase(), CrawlPhase::Done);

    let stats = crawler.stats();
    assert_eq!(stats.pages_scanned, 3);
    assert_eq!(stats.links_found, 3);
    assert_eq!(stats.records_extracted, 2);
    assert_eq!(stats.listings_skipped, 1);
    assert_eq!(stats.batches_persisted, 2);

    // One file per batch: header plus one row each
    let files = sorted_csv_files(output.path());
    assert_eq!(files.len(), 2);
    assert_eq!(files, {
        let mut written = stats.files_written.clone();
        written.sort();
        written
    });

    let batch1 = files
        .iter()
        .find(|p| p.to_string_lossy().contains("stellenwerk_jobs_batch1_"))
        .expect("Missing batch 1 file");
    let content = std::fs::read_to_string(batch1).expect("Failed to read batch 1");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "Title,Company,Location,Salary,Posted Date,URL,Dein Job,Dein Profil"
    );
    assert!(lines[1].starts_with("Lagerhilfe (m/w/d),Hafen Logistik GmbH,"));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().expect("Failed to create temp dir");

    // Every offset returns the same listing
    Mock::given(method("GET"))
        .and(path("/hamburg"))
        .respond_with(html_page(r#"<a href="/hamburg/jobs/1">Job</a>"#))
        .expect(3)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/hamburg/jobs/1", html_page("<h1>Job</h1>")).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 2, 3);
    let mut crawler = BatchCrawler::from_config(&config).expect("Failed to create crawler");
    let records = crawler.run(3).await;

    // Links are only deduplicated within a page, so each page yields a record
    assert_eq!(records.len(), 3);
    assert_eq!(crawler.stats().pages_scanned, 3);

    // Pages 1-2 form batch 1, page 3 forms batch 2
    let files = sorted_csv_files(output.path());
    assert_eq!(files.len(), 2);
    let line_counts: Vec<usize> = files
        .iter()
        .map(|f| std::fs::read_to_string(f).unwrap().lines().count())
        .collect();
    assert!(line_counts.contains(&3));
    assert!(line_counts.contains(&2));
}

#[tokio::test]
async fn test_empty_page_mid_batch_persists_and_stops() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_index(&mock_server, "0", r#"<a href="/hamburg/jobs/1">Kurier</a>"#).await;
    mount_index(&mock_server, "10", r#"<a href="/hamburg/jobs/2">Barista</a>"#).await;
    // the end of the results is scanned once, never retried
    Mock::given(method("GET"))
        .and(path("/hamburg"))
        .and(query_param("pagination[start]", "20"))
        .respond_with(html_page("<p>Keine weiteren Jobs</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/hamburg/jobs/1", html_page("<h1>Kurier</h1>")).await;
    mount_page(&mock_server, "/hamburg/jobs/2", html_page("<h1>Barista</h1>")).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 5, 40);
    let mut crawler = BatchCrawler::from_config(&config).expect("Failed to create crawler");
    let records = crawler.run(config.pacing.max_pages).await;

    assert_eq!(records.len(), 2);
    assert_eq!(crawler.phase(), CrawlPhase::Done);
    assert_eq!(crawler.stats().pages_scanned, 3);
    assert_eq!(crawler.stats().batches_persisted, 1);

    let files = sorted_csv_files(output.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].to_string_lossy().contains("stellenwerk_jobs_batch1_"));

    let content = std::fs::read_to_string(&files[0]).expect("Failed to read batch 1");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Kurier,"));
    assert!(lines[2].starts_with("Barista,"));
}

#[tokio::test]
async fn test_empty_first_page_writes_nothing() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_index(&mock_server, "0", "<p>Keine Jobs</p>").await;

    let config = create_test_config(&mock_server.uri(), output.path(), 5, 40);
    let mut crawler = BatchCrawler::from_config(&config).expect("Failed to create crawler");
    let records = crawler.run(40).await;

    assert!(records.is_empty());
    assert_eq!(crawler.stats().pages_scanned, 1);
    assert!(sorted_csv_files(output.path()).is_empty());
}

#[tokio::test]
async fn test_batch_of_failed_listings_ends_crawl() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/hamburg"))
        .respond_with(html_page(r#"<a href="/hamburg/jobs/gone">Job</a>"#))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/hamburg/jobs/gone", ResponseTemplate::new(410)).await;

    let config = create_test_config(&mock_server.uri(), output.path(), 2, 10);
    let mut crawler = BatchCrawler::from_config(&config).expect("Failed to create crawler");
    let records = crawler.run(10).await;

    assert!(records.is_empty());
    assert_eq!(crawler.stats().pages_scanned, 2);
    assert_eq!(crawler.stats().listings_skipped, 2);
    assert!(sorted_csv_files(output.path()).is_empty());
}

#[tokio::test]
async fn test_fixed_headers_sent() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri(), output.path(), 1, 1);
    config.http.user_agent = "Mozilla/5.0 (X11; Linux x86_64) TestBrowser/1.0".to_string();
    config.http.accept_language = "de-DE".to_string();
    config.http.referer = "https://www.stellenwerk.de/".to_string();

    Mock::given(method("GET"))
        .and(path("/hamburg"))
        .and(header("user-agent", config.http.user_agent.as_str()))
        .and(header("accept-language", config.http.accept_language.as_str()))
        .and(header("referer", config.http.referer.as_str()))
        .respond_with(html_page(r#"<a href="/hamburg/jobs/7">Job</a>"#))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/hamburg/jobs/7", html_page("<h1>Kellner</h1>")).await;

    let records = crawl(&config).await.expect("Crawl failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Kellner");
    assert_eq!(sorted_csv_files(output.path()).len(), 1);
}

#[tokio::test]
async fn test_scan_failure_returns_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hamburg"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let site = SiteConfig {
        base_url: format!("{}/hamburg", mock_server.uri()),
        host: mock_server.uri(),
        ..SiteConfig::default()
    };
    let scanner =
        ListingScanner::new(reqwest::Client::new(), site).expect("Failed to create scanner");

    assert!(scanner.scan(0).await.is_empty());
}

#[tokio::test]
async fn test_scan_dedups_and_excludes_account_links() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        "0",
        r#"
        <a href="/hamburg/jobs/1">A</a>
        <a href="/hamburg/jobs/1">A</a>
        <a href="/hamburg/account/x">Konto</a>
        "#,
    )
    .await;

    let site = SiteConfig {
        base_url: format!("{}/hamburg", mock_server.uri()),
        host: mock_server.uri(),
        ..SiteConfig::default()
    };
    let scanner =
        ListingScanner::new(reqwest::Client::new(), site).expect("Failed to create scanner");

    assert_eq!(
        scanner.scan(0).await,
        vec![ListingLink::from("/hamburg/jobs/1")]
    );
}
