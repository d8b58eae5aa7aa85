//! Integration tests for the repository search client.

use cve_toolkit_core::search::{GitHubSearchClient, SearchError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn items_body() -> serde_json::Value {
    json!({
        "total_count": 2,
        "items": [
            {
                "name": "CVE-2024-0001-poc",
                "description": "Proof of concept",
                "owner": {"login": "alice"},
                "stargazers_count": 42,
                "html_url": "https://github.com/alice/CVE-2024-0001-poc"
            },
            {
                "name": "cve-scanner",
                "description": null,
                "owner": {"login": "bob"},
                "stargazers_count": 0,
                "html_url": "https://github.com/bob/cve-scanner"
            }
        ]
    })
}

#[tokio::test]
async fn test_search_decodes_items_and_substitutes_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "CVE-2024 rce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items_body()))
        .mount(&mock_server)
        .await;

    let client = GitHubSearchClient::with_base_url(None, mock_server.uri());
    let hits = client.search(2024, "rce").await.expect("search should succeed");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].name, "CVE-2024-0001-poc");
    assert_eq!(hits[0].owner_login, "alice");
    assert_eq!(hits[0].star_count, 42);
    assert_eq!(hits[1].description, "No description");
    assert_eq!(hits[1].star_count, 0);
}

#[tokio::test]
async fn test_search_sends_bearer_token_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(header("Authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        GitHubSearchClient::with_base_url(Some("ghp_test".to_string()), mock_server.uri());
    let hits = client.search(2023, "").await.expect("search should succeed");
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_search_without_token_sends_no_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&mock_server)
        .await;

    let client = GitHubSearchClient::with_base_url(None, mock_server.uri());
    let hits = client.search(2023, "x").await.expect("search should succeed");
    assert!(hits.is_empty());

    let requests = mock_server
        .received_requests()
        .await
        .expect("requests recorded");
    assert!(
        requests
            .iter()
            .all(|request| !request.headers.contains_key("authorization")),
        "No Authorization header should be sent without a token"
    );
}

#[tokio::test]
async fn test_search_surfaces_non_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = GitHubSearchClient::with_base_url(None, mock_server.uri());
    let result = client.search(2024, "rce").await;

    match result {
        Err(SearchError::HttpStatus { status }) => assert_eq!(status, 403),
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_surfaces_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client = GitHubSearchClient::with_base_url(None, mock_server.uri());
    let result = client.search(2024, "rce").await;
    assert!(matches!(result, Err(SearchError::MalformedResponse { .. })));
}
