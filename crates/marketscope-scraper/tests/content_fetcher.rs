//! Integration tests for `ContentFetcher::fetch` against a local mock server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use marketscope_scraper::{ContentFetcher, FetchError, COMPETITOR_KEYWORDS};

const PRODUCT_PAGE: &str = r#"<html>
<head>
  <title>Acme Phones</title>
  <meta name="description" content="Compare Acme with any rival">
</head>
<body>
  <h1>The X1</h1>
  <p>An alternative to the flagship.</p>
  <script>console.log("competitor")</script>
</body>
</html>"#;

fn test_fetcher() -> ContentFetcher {
    ContentFetcher::new(5, "marketscope-test/0.1", 64 * 1024, 5000)
        .expect("failed to build test ContentFetcher")
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn fetch_extracts_title_description_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(PRODUCT_PAGE))
        .mount(&server)
        .await;

    let page = test_fetcher()
        .fetch(&format!("{}/", server.uri()), COMPETITOR_KEYWORDS)
        .await
        .expect("fetch should succeed");

    assert_eq!(page.title, "Acme Phones");
    assert_eq!(page.description, "Compare Acme with any rival");
    assert_eq!(page.content, "The X1 An alternative to the flagship.");
    assert_eq!(page.keyword_hits, vec!["alternative", "compare", "rival"]);
}

#[tokio::test]
async fn fetch_truncates_content_to_bound() {
    let server = MockServer::start().await;
    let long = format!("<p>{}</p>", "a".repeat(200));
    Mock::given(method("GET"))
        .respond_with(html_response(&long))
        .mount(&server)
        .await;

    let fetcher = ContentFetcher::new(5, "marketscope-test/0.1", 64 * 1024, 50).unwrap();
    let page = fetcher.fetch(&server.uri(), &[]).await.unwrap();
    assert_eq!(page.content.chars().count(), 50);
}

#[tokio::test]
async fn fetch_non_2xx_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_fetcher().fetch(&server.uri(), &[]).await;
    assert!(
        matches!(result, Err(FetchError::UnexpectedStatus { status: 404, .. })),
        "expected UnexpectedStatus(404), got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_fetcher().fetch(&server.uri(), &[]).await;
    assert!(
        matches!(result, Err(FetchError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_rejects_non_html_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0_u8, 1, 2, 3], "image/png"))
        .mount(&server)
        .await;

    let result = test_fetcher().fetch(&server.uri(), &[]).await;
    assert!(
        matches!(result, Err(FetchError::UnsupportedContentType { ref content_type, .. }) if content_type == "image/png"),
        "expected UnsupportedContentType, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_rejects_oversized_body() {
    let server = MockServer::start().await;
    let huge = format!("<p>{}</p>", "x".repeat(2048));
    Mock::given(method("GET"))
        .respond_with(html_response(&huge))
        .mount(&server)
        .await;

    let fetcher = ContentFetcher::new(5, "marketscope-test/0.1", 1024, 5000).unwrap();
    let result = fetcher.fetch(&server.uri(), &[]).await;
    assert!(
        matches!(result, Err(FetchError::BodyTooLarge { limit: 1024, .. })),
        "expected BodyTooLarge, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_times_out_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_response(PRODUCT_PAGE).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let fetcher = ContentFetcher::new(1, "marketscope-test/0.1", 64 * 1024, 5000).unwrap();
    let result = fetcher.fetch(&server.uri(), &[]).await;
    match result {
        Err(FetchError::Http(e)) => assert!(e.is_timeout(), "expected timeout, got: {e}"),
        other => panic!("expected Http timeout error, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_unreachable_host_is_http_error() {
    let result = test_fetcher().fetch("http://127.0.0.1:9/", &[]).await;
    assert!(
        matches!(result, Err(FetchError::Http(_))),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::header("user-agent", "marketscope-test/0.1"))
        .respond_with(html_response(PRODUCT_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    test_fetcher().fetch(&server.uri(), &[]).await.unwrap();
}
