//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use keyword_crawler::config::{Config, CrawlerConfig, OutputConfig};
use keyword_crawler::crawler::{run_crawl, Crawler, HtmlParser, HttpFetcher};
use keyword_crawler::output::{BrokenLink, MemorySink};
use keyword_crawler::{KeywordSet, PageState};
use std::collections::HashSet;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Creates a crawler against live HTTP with the given keywords
fn create_crawler(config: CrawlerConfig, keywords: &[&str]) -> Crawler<HttpFetcher, HtmlParser> {
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build HTTP session");
    Crawler::new(
        config,
        KeywordSet::new(keywords.iter().copied()).expect("Failed to build keyword set"),
        fetcher,
        HtmlParser::new(),
    )
}

fn short_timeout() -> CrawlerConfig {
    CrawlerConfig {
        timeout_seconds: 5.0,
        ..CrawlerConfig::default()
    }
}

/// Mounts the home/about/missing site used by several tests
async fn mount_widget_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <p>Buy our Widget today</p>
            <a href="/about">About</a>
            <a href="/missing">Gone</a>
            </body></html>"#,
    )
    .await;
    mount_page(server, "/about", "<html><body><p>We make things.</p></body></html>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Widget not found"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_reports_matches_and_broken_links() {
    let server = MockServer::start().await;
    mount_widget_site(&server).await;
    let base_url = format!("{}/", server.uri());

    let crawler = create_crawler(short_timeout(), &["widget"]);
    let mut sink = MemorySink::new();
    let stats = crawler
        .crawl(&[base_url.clone()], &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(sink.matches.len(), 1);
    assert_eq!(sink.matches[0].url, base_url);
    assert!(sink.matches[0].matched_keywords.contains("widget"));

    // The 404 body mentions the keyword but must not be scanned
    assert_eq!(
        sink.broken,
        vec![BrokenLink {
            referrer_url: base_url.clone(),
            target_url: format!("{}/missing", server.uri()),
            reason: "HttpStatus(404)".to_string(),
        }]
    );

    assert_eq!(stats.count(PageState::Matched), 1);
    assert_eq!(stats.count(PageState::Unmatched), 1);
    assert_eq!(stats.count(PageState::Failed), 1);
}

#[tokio::test]
async fn test_case_insensitive_match_in_visible_text_only() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><head><script>var gadget = 1;</script></head>
           <body><h1>WIDGET special</h1><a href="/gadget-page" title="gadget">x</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/gadget-page", "<p>nothing</p>").await;

    let crawler = create_crawler(short_timeout(), &["widget", "gadget"]);
    let mut sink = MemorySink::new();
    crawler
        .crawl(&[server.uri()], &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(sink.matches.len(), 1);
    let keywords: Vec<_> = sink.matches[0].matched_keywords.iter().cloned().collect();
    assert_eq!(keywords, vec!["widget".to_string()]);
}

#[tokio::test]
async fn test_mailto_links_are_ignored() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="mailto:a@b.com">mail</a><a href="tel:+123">call</a>"#,
    )
    .await;

    let crawler = create_crawler(short_timeout(), &["widget"]);
    let mut sink = MemorySink::new();
    let stats = crawler
        .crawl(&[server.uri()], &mut sink)
        .await
        .expect("Crawl failed");

    assert!(sink.matches.is_empty());
    assert!(sink.broken.is_empty());
    assert_eq!(stats.links_invalid, 2);
    assert_eq!(stats.pages_fetched(), 1);
}

#[tokio::test]
async fn test_depth_limit_stops_following_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&server, "/level1", r#"<a href="/level2">2</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html("too deep"))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        max_depth: Some(1),
        ..short_timeout()
    };
    let crawler = create_crawler(config, &["widget"]);
    let stats = crawler
        .crawl(&[server.uri()], &mut MemorySink::new())
        .await
        .expect("Crawl failed");

    assert_eq!(stats.pages_fetched(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_robots_disallow_respected_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /private\n")
                .insert_header("content-type", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/a">a</a><a href="/public">b</a>"#,
    )
    .await;
    mount_page(&server, "/public", "widget").await;
    Mock::given(method("GET"))
        .and(path("/private/a"))
        .respond_with(html("widget"))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        respect_robots: true,
        ..short_timeout()
    };
    let crawler = create_crawler(config, &["widget"]);
    let mut sink = MemorySink::new();
    let stats = crawler
        .crawl(&[server.uri()], &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(sink.matches.len(), 1);
    assert_eq!(sink.matches[0].url, format!("{}/public", server.uri()));
    assert_eq!(stats.count(PageState::Disallowed), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_links_to_other_hosts_not_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="http://other.invalid/page">elsewhere</a><a href="/local">here</a>"#,
    )
    .await;
    mount_page(&server, "/local", "widget").await;

    let crawler = create_crawler(short_timeout(), &["widget"]);
    let mut sink = MemorySink::new();
    let stats = crawler
        .crawl(&[server.uri()], &mut sink)
        .await
        .expect("Crawl failed");

    // An unresolvable host would show up as a broken link if it were fetched
    assert!(sink.broken.is_empty());
    assert_eq!(sink.matches.len(), 1);
    assert_eq!(stats.links_out_of_scope, 1);
}

#[tokio::test]
async fn test_timeout_reported_as_broken_link() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/slow">slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        timeout_seconds: 0.5,
        ..CrawlerConfig::default()
    };
    let crawler = create_crawler(config, &["widget"]);
    let mut sink = MemorySink::new();
    crawler
        .crawl(&[server.uri()], &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(sink.broken.len(), 1);
    assert_eq!(sink.broken[0].reason, "Timeout");
    assert_eq!(sink.broken[0].target_url, format!("{}/slow", server.uri()));
}

#[tokio::test]
async fn test_repeated_runs_produce_same_records() {
    let server = MockServer::start().await;
    mount_widget_site(&server).await;

    let crawler = create_crawler(short_timeout(), &["widget"]);

    let mut first = MemorySink::new();
    crawler.crawl(&[server.uri()], &mut first).await.expect("Crawl failed");
    let mut second = MemorySink::new();
    crawler.crawl(&[server.uri()], &mut second).await.expect("Crawl failed");

    assert_eq!(first.matches, second.matches);
    assert_eq!(first.broken, second.broken);
}

#[tokio::test]
async fn test_csv_sink_end_to_end() {
    let server = MockServer::start().await;
    mount_widget_site(&server).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let results_path = dir.path().join("results.csv");
    let error_log_path = dir.path().join("errors.log");

    let config = Config {
        base_urls: vec![server.uri()],
        keywords: vec!["Widget".to_string(), "gizmo".to_string()],
        crawler: short_timeout(),
        output: OutputConfig {
            results_path: results_path.to_string_lossy().into_owned(),
            error_log_path: error_log_path.to_string_lossy().into_owned(),
            ..OutputConfig::default()
        },
        ..Config::default()
    };

    let stats = run_crawl(&config).await.expect("Crawl failed");
    assert_eq!(stats.count(PageState::Matched), 1);

    let results = std::fs::read_to_string(&results_path).expect("Missing results file");
    assert_eq!(
        results,
        format!("url,keywords\n{}/,Widget\n", server.uri())
    );

    let log = std::fs::read_to_string(&error_log_path).expect("Missing error log");
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains(&format!(
        "ERROR - Broken link found: {}/missing. Referring page: {}/. Reason: HttpStatus(404)",
        server.uri(),
        server.uri()
    )));
}

#[tokio::test]
async fn test_concurrent_crawl_matches_sequential() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>Widget home</p><a href="/about">About</a><a href="/missing">Gone</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<p>Widget makers</p><a href="/team">team</a><a href="/gone">gone</a>"#,
    )
    .await;
    mount_page(&server, "/team", "<p>widget people</p>").await;

    let sequential = create_crawler(short_timeout(), &["widget"]);
    let mut expected = MemorySink::new();
    sequential
        .crawl(&[server.uri()], &mut expected)
        .await
        .expect("Crawl failed");

    let config = CrawlerConfig {
        concurrency: 4,
        ..short_timeout()
    };
    let concurrent = create_crawler(config, &["widget"]);
    let mut actual = MemorySink::new();
    concurrent
        .crawl(&[server.uri()], &mut actual)
        .await
        .expect("Crawl failed");

    let matches = |sink: &MemorySink| sink.matches.iter().cloned().collect::<HashSet<_>>();
    let broken = |sink: &MemorySink| sink.broken.iter().cloned().collect::<HashSet<_>>();
    assert_eq!(matches(&expected), matches(&actual));
    assert_eq!(broken(&expected), broken(&actual));
    assert_eq!(actual.matches.len(), 3);
    assert_eq!(actual.broken.len(), 2);
}
