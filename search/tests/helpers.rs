//! Test helper utilities for search integration tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use search::{SearchApi, SearchError, SearchResult};
use shared::{SearchPayload, SearchResponse};

/// Search collaborator that counts calls and can be slowed down or failed
#[derive(Clone)]
pub struct StubSearchApi {
    calls: Arc<AtomicUsize>,
    payloads: Arc<Mutex<Vec<SearchPayload>>>,
    failing: Arc<AtomicBool>,
    delay: Duration,
    response: SearchResponse,
}

impl StubSearchApi {
    pub fn new(response: SearchResponse) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            payloads: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
            delay: Duration::ZERO,
            response,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<SearchPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchApi for StubSearchApi {
    async fn search_college_courses(&self, payload: &SearchPayload) -> SearchResult<SearchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SearchError::BackendError {
                status: Some(500),
                message: "stub failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}

/// Helper to wait for async conditions with timeout
pub async fn wait_for_condition<F>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if condition() {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Short debounce window keeping tests fast
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(40);
