//! ReqwestFetcher against a local mock server.

use std::collections::HashMap;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagefetch::{FetchError, FetchResult, Fetcher, HttpMethod, RequestSpec, ReqwestFetcher};

fn spec(server: &MockServer, route: &str) -> RequestSpec {
    let url = Url::parse(&format!("{}{route}", server.uri())).unwrap();
    RequestSpec::get(url)
}

#[tokio::test]
async fn json_content_type_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"items":[1,2,3]}"#, "application/json; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new().unwrap();
    let result = fetcher.fetch(&spec(&server, "/api/items")).await.unwrap();
    assert_eq!(result, FetchResult::Json(json!({"items": [1, 2, 3]})));
}

#[tokio::test]
async fn other_content_types_return_raw_text() {
    let server = MockServer::start().await;
    let html = "<html><body>  hello\n</body></html>";
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new().unwrap();
    let result = fetcher.fetch(&spec(&server, "/page")).await.unwrap();
    assert_eq!(result, FetchResult::Text(html.to_string()));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new().unwrap();
    let err = fetcher.fetch(&spec(&server, "/missing")).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.to_string(),
        "API request failed: HTTP error! status: 404"
    );
}

#[tokio::test]
async fn post_sends_body_and_forces_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(header("content-type", "application/json"))
        .and(header("x-api-key", "secret"))
        .and(body_string(r#"{"q":"x"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HashMap::new();
    headers.insert("X-Api-Key".to_string(), "secret".to_string());
    headers.insert("Content-Type".to_string(), "text/plain".to_string());

    let mut request = spec(&server, "/submit");
    request.method = HttpMethod::Post;
    request.headers = headers;
    request.body = Some(r#"{"q":"x"}"#.to_string());

    let fetcher = ReqwestFetcher::new().unwrap();
    let result = fetcher.fetch(&request).await.unwrap();
    assert_eq!(result, FetchResult::Text("created".to_string()));
}

#[tokio::test]
async fn delete_without_body_sends_empty_payload() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = spec(&server, "/items/1");
    request.method = HttpMethod::Delete;

    let fetcher = ReqwestFetcher::new().unwrap();
    let result = fetcher.fetch(&request).await.unwrap();
    assert_eq!(result, FetchResult::Text(String::new()));
}

#[tokio::test]
async fn malformed_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{not json", "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new().unwrap();
    let err = fetcher.fetch(&spec(&server, "/bad")).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    // Nothing listens on port 1.
    let request = RequestSpec::get(Url::parse("http://127.0.0.1:1/gone").unwrap());

    let fetcher = ReqwestFetcher::new().unwrap();
    let err = fetcher.fetch(&request).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got: {err}");
}
