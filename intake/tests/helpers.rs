//! Test helper utilities for intake integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use intake::{IntakeResult, MockClock, RegistrationApi, WishlistApi};
use shared::{RegistrationAck, RegistrationRequest, RegistrationResponse, WishlistResponse};

/// Clock pinned to one date
pub fn fixed_clock(date: NaiveDate) -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_today().return_const(date);
    clock
}

pub fn accepted(registration_id: serde_json::Value) -> RegistrationResponse {
    RegistrationResponse {
        success: true,
        response: Some(RegistrationAck { registration_id }),
        message: None,
    }
}

/// Collaborators that answer successfully after a delay and count calls
#[derive(Clone)]
pub struct SlowApi {
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl SlowApi {
    pub fn new(delay: Duration) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrationApi for SlowApi {
    async fn start_course_registration(&self, _request: &RegistrationRequest) -> IntakeResult<RegistrationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(accepted(serde_json::json!(1)))
    }
}

#[async_trait]
impl WishlistApi for SlowApi {
    async fn add_wishlist_item(&self, _student_id: u64, _course_id: &str) -> IntakeResult<WishlistResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(WishlistResponse {
            success: true,
            message: None,
        })
    }
}
