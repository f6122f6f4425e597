//! Tests for RealSearchApi

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared::{FilterPayload, PagePayload, SearchPayload, SearchTerm};
use crate::error::SearchError;
use crate::services::search_api::RealSearchApi;
use crate::traits::SearchApi;

fn payload(term: &str) -> SearchPayload {
    SearchPayload {
        pagination: PagePayload { page: 2, size: 12 },
        filters: FilterPayload {
            countries: vec!["United Kingdom".to_string()],
            ..FilterPayload::default()
        },
        search: SearchTerm { term: term.to_string() },
    }
}

fn api_for(server: &MockServer) -> RealSearchApi {
    RealSearchApi::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_search_posts_payload_and_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/college-courses/search"))
        .and(body_partial_json(json!({
            "pagination": {"page": 2, "size": 12},
            "filters": {"countries": ["United Kingdom"]},
            "search": {"term": "data"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"collegeCourseId": 7, "courseName": "MSc Data Science"}],
            "pagination": {"currentPage": 2, "pageSize": 12, "totalPages": 4, "totalItems": 40}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server).search_college_courses(&payload("data")).await.unwrap();

    assert_eq!(response.data.len(), 1);
    let pagination = response.pagination.unwrap();
    assert_eq!(pagination.total_pages, Some(4));
    assert_eq!(pagination.total_items, Some(40));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/college-courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = RealSearchApi::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
    let response = api.search_college_courses(&payload("")).await.unwrap();

    assert!(response.data.is_empty());
    assert!(response.pagination.is_none());
}

#[tokio::test]
async fn test_non_success_status_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/college-courses/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = api_for(&server).search_college_courses(&payload("data")).await.unwrap_err();

    match err {
        SearchError::BackendError { status, message } => {
            assert_eq!(status, Some(503));
            assert!(message.contains("upstream unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_success_false_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/college-courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "invalid filters"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).search_college_courses(&payload("data")).await.unwrap_err();

    assert!(matches!(err, SearchError::BackendError { ref message, .. } if message == "invalid filters"));
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/college-courses/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).search_college_courses(&payload("data")).await.unwrap_err();

    assert!(matches!(err, SearchError::JsonError(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let api = RealSearchApi::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

    let err = api.search_college_courses(&payload("data")).await.unwrap_err();

    assert!(matches!(err, SearchError::NetworkError(_)));
}
