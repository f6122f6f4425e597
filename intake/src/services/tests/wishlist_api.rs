//! Tests for RealWishlistApi

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::IntakeError;
use crate::services::wishlist_api::RealWishlistApi;
use crate::traits::WishlistApi;

#[tokio::test]
async fn test_add_posts_course_id_under_student_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/students/1042/wishlist"))
        .and(body_json(json!({"courseId": "C-12"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = RealWishlistApi::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
    let response = api.add_wishlist_item(1042, "C-12").await.unwrap();

    assert!(response.success);
    assert!(response.message.is_none());
}

#[tokio::test]
async fn test_conflict_status_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/students/1042/wishlist"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "Course already in wishlist"
        })))
        .mount(&server)
        .await;

    let api = RealWishlistApi::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let err = api.add_wishlist_item(1042, "C-12").await.unwrap_err();

    assert!(matches!(err, IntakeError::BackendError { status: Some(409), ref message } if message.contains("already")));
}

#[tokio::test]
async fn test_malformed_success_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/students/1042/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let api = RealWishlistApi::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let err = api.add_wishlist_item(1042, "C-12").await.unwrap_err();

    assert!(matches!(err, IntakeError::JsonError(_)));
}
