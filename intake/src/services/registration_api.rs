//! HTTP implementation of the registration collaborator

use std::time::Duration;

use async_trait::async_trait;

use shared::{RegistrationRequest, RegistrationResponse};
use crate::error::{IntakeError, IntakeResult};
use crate::traits::RegistrationApi;

/// Registration collaborator backed by the marketplace REST API
pub struct RealRegistrationApi {
    client: reqwest::Client,
    base_url: String,
}

impl RealRegistrationApi {
    pub const REGISTRATION_PATH: &'static str = "/course-registrations";

    pub fn new(base_url: &str, timeout: Duration) -> IntakeResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RegistrationApi for RealRegistrationApi {
    async fn start_course_registration(&self, request: &RegistrationRequest) -> IntakeResult<RegistrationResponse> {
        let url = format!("{}{}", self.base_url, Self::REGISTRATION_PATH);
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            // Rejections usually still carry a `{success, message}` body
            let message = serde_json::from_slice::<RegistrationResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).chars().take(200).collect());
            return Err(IntakeError::BackendError {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
