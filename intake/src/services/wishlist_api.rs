//! HTTP implementation of the wishlist collaborator

use std::time::Duration;

use async_trait::async_trait;

use shared::{WishlistRequest, WishlistResponse};
use crate::error::{IntakeError, IntakeResult};
use crate::traits::WishlistApi;

/// Wishlist collaborator backed by the marketplace REST API
pub struct RealWishlistApi {
    client: reqwest::Client,
    base_url: String,
}

impl RealWishlistApi {
    pub fn new(base_url: &str, timeout: Duration) -> IntakeResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn wishlist_url(&self, student_id: u64) -> String {
        format!("{}/students/{}/wishlist", self.base_url, student_id)
    }
}

#[async_trait]
impl WishlistApi for RealWishlistApi {
    async fn add_wishlist_item(&self, student_id: u64, course_id: &str) -> IntakeResult<WishlistResponse> {
        let body = WishlistRequest {
            course_id: course_id.to_string(),
        };
        let response = self.client.post(self.wishlist_url(student_id)).json(&body).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<WishlistResponse>(&bytes)
                .ok()
                .and_then(|parsed| parsed.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).chars().take(200).collect());
            return Err(IntakeError::BackendError {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
