mod common;

use std::time::{Duration, Instant};

use tokio::net::TcpListener;

use common::{serve, Routes};
use company_researcher::crawler::{CrawlConfig, Crawler};
use company_researcher::error::{CrawlError, FetchError};

fn test_config() -> CrawlConfig {
    CrawlConfig {
        request_delay_ms: 10,
        fetch_timeout_seconds: 2,
        ..CrawlConfig::default()
    }
}

#[tokio::test]
async fn unreachable_base_url_is_a_fatal_network_failure() {
    // Bind then drop so the port is known-dead.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let crawler = Crawler::new(test_config());
    let result = crawler.crawl(&format!("http://{}/", addr)).await;
    assert!(matches!(
        result,
        Err(CrawlError::BasePage(FetchError::Network { .. }))
    ));
}

#[tokio::test]
async fn malformed_base_url_is_rejected_before_any_fetch() {
    let crawler = Crawler::new(test_config());
    let result = crawler.crawl("acme.io/about").await;
    assert!(matches!(result, Err(CrawlError::InvalidBaseUrl(_))));
}

#[tokio::test]
async fn failing_secondary_page_is_skipped_not_fatal() {
    let mut routes = Routes::new();
    routes.insert(
        "/",
        (
            200,
            r#"<html><head><title>Acme Corp - Home</title></head><body>
               <a href="/about">About us</a>
               <a href="/team">Our team</a>
               <p>Acme builds rockets.</p></body></html>"#
                .to_string(),
        ),
    );
    routes.insert(
        "/about",
        (200, "<html><body>Founded in a garage.</body></html>".to_string()),
    );
    // "/team" has no route and 404s.
    let addr = serve(routes).await;

    let crawler = Crawler::new(test_config());
    let result = crawler
        .crawl(&format!("http://{}/", addr))
        .await
        .expect("crawl should tolerate one failing secondary page");

    assert_eq!(result.scraped_pages_count, 2);
    assert_eq!(result.company_name, "Acme Corp");
    assert!(result.aggregated_text.contains("Acme builds rockets."));
    assert!(result.aggregated_text.contains("Founded in a garage."));
}

#[tokio::test]
async fn page_budget_caps_secondary_fetches() {
    let mut routes = Routes::new();
    routes.insert(
        "/",
        (
            200,
            r#"<html><body>
               <a href="/about">About</a>
               <a href="/careers">Careers</a>
               <a href="/press">Press</a>
               </body></html>"#
                .to_string(),
        ),
    );
    for path in ["/about", "/careers", "/press"] {
        routes.insert(path, (200, "<html><body>page</body></html>".to_string()));
    }
    let addr = serve(routes).await;

    let crawler = Crawler::new(CrawlConfig {
        max_pages: 2,
        ..test_config()
    });
    let result = crawler.crawl(&format!("http://{}/", addr)).await.unwrap();

    assert_eq!(result.scraped_pages_count, 2);
    assert_eq!(result.pages[1].url, format!("http://{}/about", addr));
}

#[tokio::test]
async fn exceeded_deadline_returns_partial_result() {
    let mut routes = Routes::new();
    routes.insert(
        "/",
        (
            200,
            r#"<html><body><a href="/about">About</a>
               <a href="/careers">Careers</a></body></html>"#
                .to_string(),
        ),
    );
    routes.insert("/about", (200, "<html><body>about</body></html>".to_string()));
    routes.insert("/careers", (200, "<html><body>careers</body></html>".to_string()));
    let addr = serve(routes).await;

    let crawler = Crawler::new(CrawlConfig {
        overall_deadline_ms: Some(0),
        ..test_config()
    });
    let result = crawler.crawl(&format!("http://{}/", addr)).await.unwrap();

    // Deadline already spent after the base page: no secondary fetches,
    // but the crawl still succeeds with what it has.
    assert_eq!(result.scraped_pages_count, 1);
}

#[tokio::test]
async fn oversized_base_page_is_rejected() {
    let mut routes = Routes::new();
    routes.insert(
        "/",
        (200, format!("<html><body>{}</body></html>", "x".repeat(4096))),
    );
    let addr = serve(routes).await;

    let crawler = Crawler::new(CrawlConfig {
        max_body_bytes: 1024,
        ..test_config()
    });
    let result = crawler.crawl(&format!("http://{}/", addr)).await;
    assert!(matches!(
        result,
        Err(CrawlError::BasePage(FetchError::BodyTooLarge { .. }))
    ));
}

#[tokio::test]
async fn fetch_times_out_instead_of_blocking() {
    // Accepts connections but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _hold = stream;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });

    let crawler = Crawler::new(CrawlConfig {
        fetch_timeout_seconds: 1,
        ..test_config()
    });
    let started = Instant::now();
    let result = crawler.crawl(&format!("http://{}/", addr)).await;

    assert!(matches!(
        result,
        Err(CrawlError::BasePage(FetchError::Timeout { .. }))
    ));
    assert!(started.elapsed() < Duration::from_secs(10));
}
