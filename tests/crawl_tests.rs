//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole crawls
//! against them.

use doc_atlas::config::Config;
use doc_atlas::state::PageState;
use doc_atlas::Crawler;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast configuration suitable for a local mock server
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.politeness_delay_ms = 0;
    config.crawler.concurrency = 4;
    config.fetch.max_retries = 0;
    config.fetch.backoff_base_ms = 1;
    config
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.as_bytes().to_vec(), "text/html"))
        .mount(server)
        .await;
}

fn seed(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

#[tokio::test]
async fn test_cycle_terminates() {
    let server = MockServer::start().await;
    mount_page(&server, "/docs", r#"<main><p>Start</p><a href="/docs/a">A</a></main>"#).await;
    mount_page(&server, "/docs/a", r#"<main><p>A</p><a href="/docs/b">B</a></main>"#).await;
    mount_page(&server, "/docs/b", r#"<main><p>B</p><a href="/docs">Back</a></main>"#).await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), crawler.crawl(&seed(&server, "/docs")))
        .await
        .expect("crawl did not terminate")
        .unwrap();

    assert_eq!(result.documents.len(), 3);
    assert_eq!(result.stats.pages_attempted, 3);
    assert!(!result.cancelled);
}

#[tokio::test]
async fn test_shared_links_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<main><p>Home</p><a href="/shared">S</a><a href="/a">A</a><a href="/b">B</a></main>"#,
    )
    .await;
    mount_page(&server, "/a", r#"<main><p>A</p><a href="/shared#top">S</a></main>"#).await;
    mount_page(&server, "/b", r#"<main><p>B</p><a href="/shared/">S</a></main>"#).await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"<main><p>Shared</p></main>".to_vec(), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert_eq!(result.documents.len(), 4);
    let shared: Vec<_> = result
        .documents
        .keys()
        .filter(|url| url.contains("shared"))
        .collect();
    assert_eq!(shared.len(), 1);
}

#[tokio::test]
async fn test_cross_domain_links_not_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<main><p>Home</p>
            <a href="http://elsewhere.invalid/page">Out</a>
            <a href="/local">Local</a></main>"#,
    )
    .await;
    mount_page(&server, "/local", "<main><p>Local</p></main>").await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    let host = seed(&server, "/").host_str().unwrap().to_string();
    assert_eq!(result.documents.len(), 2);
    for document in result.documents.values() {
        assert_eq!(document.url.host_str(), Some(host.as_str()));
    }
    assert!(result.failures.is_empty());
    // The external link was still seen on the page
    assert!(result.stats.links_discovered >= 2);
}

#[tokio::test]
async fn test_timeout_on_every_retry_is_recorded() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<main><p>Home</p><a href="/slow">Slow</a><a href="/fast">Fast</a></main>"#,
    )
    .await;
    mount_page(&server, "/fast", "<main><p>Fast</p></main>").await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>late</p>".to_vec(), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.fetch.request_timeout_ms = 300;
    config.fetch.max_retries = 1;

    let crawler = Crawler::new(config).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert_eq!(result.documents.len(), 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].url.path(), "/slow");
    assert_eq!(result.failures[0].state, PageState::Unreachable);
    assert!(result.document(&format!("{}/fast", server.uri())).is_some());
}

#[tokio::test]
async fn test_robots_disallow_respected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<main><p>Home</p><a href="/private/keys">Keys</a><a href="/public">Public</a></main>"#,
    )
    .await;
    mount_page(&server, "/public", "<main><p>Public</p></main>").await;
    Mock::given(method("GET"))
        .and(path("/private/keys"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert_eq!(result.documents.len(), 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].state, PageState::RobotsDenied);
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/", "<main><p>Home</p></main>").await;

    let mut config = create_test_config();
    config.crawler.respect_robots = false;

    let crawler = Crawler::new(config).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();
    assert_eq!(result.documents.len(), 1);
}

#[tokio::test]
async fn test_max_pages_caps_crawl() {
    let server = MockServer::start().await;
    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &format!("<main><p>Home</p>{}</main>", links)).await;
    for i in 0..20 {
        mount_page(&server, &format!("/p{}", i), "<main><p>Page</p></main>").await;
    }

    let mut config = create_test_config();
    config.crawler.max_pages = 5;

    let crawler = Crawler::new(config).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert_eq!(result.documents.len(), 5);
    assert_eq!(result.stats.links_enqueued, 5);
}

#[tokio::test]
async fn test_max_depth_limits_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<main><p>0</p><a href="/one">1</a></main>"#).await;
    mount_page(&server, "/one", r#"<main><p>1</p><a href="/two">2</a></main>"#).await;
    mount_page(&server, "/two", r#"<main><p>2</p><a href="/three">3</a></main>"#).await;
    mount_page(&server, "/three", "<main><p>3</p></main>").await;

    let mut config = create_test_config();
    config.crawler.max_depth = 2;

    let crawler = Crawler::new(config).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert_eq!(result.documents.len(), 3);
    assert!(result.document(&format!("{}/three", server.uri())).is_none());
}

#[tokio::test]
async fn test_redirect_target_becomes_document_url() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<main><p>Home</p><a href="/old">Old</a><a href="/new">New</a></main>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    mount_page(&server, "/new", "<main><p>New home</p></main>").await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    // /old and /new resolve to the same document
    assert_eq!(result.documents.len(), 2);
    assert!(result.document(&format!("{}/new", server.uri())).is_some());
    assert!(result.document(&format!("{}/old", server.uri())).is_none());
    assert!(result.failures.is_empty());
}

#[tokio::test]
async fn test_non_html_is_content_mismatch() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<main><p>Home</p><a href="/data">Data</a></main>"#).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"))
        .mount(&server)
        .await;

    let crawler = Crawler::new(create_test_config()).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert_eq!(result.documents.len(), 1);
    assert_eq!(result.failures[0].state, PageState::ContentMismatch);
}

#[tokio::test]
async fn test_deadline_returns_partial_result() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<main><p>Home</p><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a></main>"#,
    )
    .await;
    for route in ["/a", "/b", "/c"] {
        mount_page(&server, route, "<main><p>Leaf</p></main>").await;
    }

    let mut config = create_test_config();
    config.crawler.concurrency = 1;
    // Every request after the first waits two seconds for its slot
    config.crawler.politeness_delay_ms = 2_000;
    config.crawler.max_duration_secs = Some(1);

    let crawler = Crawler::new(config).unwrap();
    let result = crawler.crawl(&seed(&server, "/")).await.unwrap();

    assert!(result.cancelled);
    assert!(!result.documents.is_empty());
    assert!(result.documents.len() < 4);
}
