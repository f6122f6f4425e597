//! HTTP implementation of the search collaborator

use std::time::Duration;

use async_trait::async_trait;

use shared::{SearchPayload, SearchResponse};
use crate::error::{SearchError, SearchResult};
use crate::traits::SearchApi;

/// Search collaborator backed by the marketplace REST API
pub struct RealSearchApi {
    client: reqwest::Client,
    base_url: String,
}

impl RealSearchApi {
    pub const SEARCH_PATH: &'static str = "/college-courses/search";

    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> SearchResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url, Self::SEARCH_PATH)
    }
}

#[async_trait]
impl SearchApi for RealSearchApi {
    async fn search_college_courses(&self, payload: &SearchPayload) -> SearchResult<SearchResponse> {
        let response = self
            .client
            .post(self.search_url())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(SearchError::BackendError {
                status: Some(status.as_u16()),
                message: String::from_utf8_lossy(&body).chars().take(200).collect(),
            });
        }

        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        if parsed.success == Some(false) {
            return Err(SearchError::BackendError {
                status: Some(status.as_u16()),
                message: parsed
                    .message
                    .unwrap_or_else(|| "search reported failure".to_string()),
            });
        }

        Ok(parsed)
    }
}
