//! Collaborator trait definitions for dependency injection

use async_trait::async_trait;

use shared::{ResultPage, SearchPayload, SearchResponse};
use crate::error::SearchResult;
use crate::types::CanonicalKey;

/// Backend search collaborator
#[mockall::automock]
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Run one search against the backend
    async fn search_college_courses(&self, payload: &SearchPayload) -> SearchResult<SearchResponse>;
}

/// Durable cache of successful result pages
///
/// The single-slot policy ignores `key` on load and always returns the last
/// page stored; the keyed policy only returns a page stored under `key`.
#[mockall::automock]
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Read the cached page, if any; unreadable blobs count as a miss
    async fn load(&self, key: &CanonicalKey) -> SearchResult<Option<ResultPage>>;

    /// Overwrite the cached page
    async fn store(&self, key: &CanonicalKey, page: &ResultPage) -> SearchResult<()>;

    /// Drop every cached page
    async fn clear(&self) -> SearchResult<()>;
}
