//! Fetch coordinator with dependency injection
//!
//! Owns the request lifecycle for backend-driven verticals: debounced
//! triggers, canonical-key de-duplication, a single in-flight request,
//! write-through caching and the empty-page fallback on failure.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use shared::logging::ComponentId;
use shared::{component_debug, component_info, component_warn, CourseListing, ListingSource, ResultPage};
use crate::core::mapper::map_batch;
use crate::core::pagination::server_pagination;
use crate::core::query_builder::build_payload;
use crate::error::SearchResult;
use crate::traits::{ResultCache, SearchApi};
use crate::types::{CanonicalKey, FetchOutcome, FetchPhase, SearchQuery};

/// Default debounce window for search input
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Mutable coordinator state, always updated under one write lock
#[derive(Debug)]
struct CoordinatorState {
    phase: FetchPhase,
    /// Key of the last successfully served (or restored) query
    last_key: Option<CanonicalKey>,
    requests_issued: u64,
}

/// Parts shared with the debounce task
struct CoordinatorInner<A, C> {
    api: A,
    cache: C,
    state: RwLock<CoordinatorState>,
}

/// Fetch coordinator for one results view
pub struct FetchCoordinator<A, C>
where
    A: SearchApi + 'static,
    C: ResultCache + 'static,
{
    inner: Arc<CoordinatorInner<A, C>>,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A, C> FetchCoordinator<A, C>
where
    A: SearchApi + 'static,
    C: ResultCache + 'static,
{
    /// Create new coordinator instance
    pub fn new(api: A, cache: C, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                api,
                cache,
                state: RwLock::new(CoordinatorState {
                    phase: FetchPhase::Idle,
                    last_key: None,
                    requests_issued: 0,
                }),
            }),
            debounce,
            pending: Mutex::new(None),
        }
    }

    fn pending_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Render the cached page on mount, before any fetch has happened
    ///
    /// On a hit the query's key, moved to the restored page number, becomes
    /// the last served key. A session that adopts the restored page then
    /// skips the mount-triggered fetch for the same selections.
    pub async fn restore_from_cache(&self, query: &SearchQuery) -> SearchResult<Option<ResultPage>> {
        if !matches!(self.inner.state.read().await.phase, FetchPhase::Idle) {
            return Ok(None);
        }

        let Some(page) = self.inner.cache.load(&query.canonical_key()?).await? else {
            return Ok(None);
        };
        let restored_page = page
            .pagination
            .current_page
            .clamp(1, page.pagination.total_pages.max(1));
        let key = query.clone().with_page(restored_page).canonical_key()?;

        let mut state = self.inner.state.write().await;
        // A fetch may have started while the cache was being read
        if !matches!(state.phase, FetchPhase::Idle) {
            return Ok(None);
        }
        state.phase = FetchPhase::Ready {
            page: page.clone(),
            from_cache: true,
        };
        state.last_key = Some(key);

        component_info!(
            ComponentId::current(),
            items = page.items.len(),
            "📦 Restored cached result page"
        );
        Ok(Some(page))
    }

    /// Trigger a fetch after the debounce window
    ///
    /// A pending trigger is cancelled and its timer restarted. Once the
    /// timer has fired the request can no longer be cancelled.
    pub fn schedule(&self, query: SearchQuery) {
        let inner = Arc::clone(&self.inner);
        let debounce = self.debounce;

        let mut pending = self.pending_slot();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        component_debug!(
            ComponentId::current(),
            page = query.page(),
            debounce_ms = debounce.as_millis() as u64,
            "Search scheduled"
        );

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // The request runs in its own task; aborting this one only
            // detaches it, so a sent request always settles the phase
            let request = tokio::spawn(async move { inner.fetch(&query).await });
            match request.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    component_warn!(ComponentId::current(), error = %e, "Debounced fetch could not start");
                }
                Err(e) => {
                    component_warn!(ComponentId::current(), error = %e, "Debounced fetch task failed");
                }
            }
        }));
    }

    /// Issue a fetch immediately, subject to the de-duplication guards
    pub async fn fetch_now(&self, query: &SearchQuery) -> SearchResult<FetchOutcome> {
        self.inner.fetch(query).await
    }

    /// Cancel a pending debounce timer; true if a trigger was outstanding
    ///
    /// A request already sent keeps running and still updates the phase.
    pub fn cancel_pending(&self) -> bool {
        match self.pending_slot().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// True while a debounce timer or its fetch has not completed
    pub fn has_pending(&self) -> bool {
        self.pending_slot().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Tear down: clear the debounce timer
    ///
    /// An in-flight request is left to finish; its result still lands in
    /// the cache.
    pub fn shutdown(&self) {
        if self.cancel_pending() {
            component_debug!(ComponentId::current(), "Cancelled pending search trigger on teardown");
        }
    }

    pub async fn phase(&self) -> FetchPhase {
        self.inner.state.read().await.phase.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.phase.is_loading()
    }

    /// Page to render; `None` while loading or before anything is known
    pub async fn visible_page(&self) -> Option<ResultPage> {
        self.inner.state.read().await.phase.page().cloned()
    }

    pub async fn last_key(&self) -> Option<CanonicalKey> {
        self.inner.state.read().await.last_key.clone()
    }

    /// Number of requests actually sent to the search collaborator
    pub async fn requests_issued(&self) -> u64 {
        self.inner.state.read().await.requests_issued
    }

    /// Edit the items of the rendered page in place (e.g. favorite flags)
    ///
    /// Returns false when there is no ready page to edit.
    pub async fn update_items<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut Vec<CourseListing>),
    {
        let mut state = self.inner.state.write().await;
        match &mut state.phase {
            FetchPhase::Ready { page, .. } => {
                update(&mut page.items);
                true
            }
            _ => false,
        }
    }
}

impl<A, C> Drop for FetchCoordinator<A, C>
where
    A: SearchApi + 'static,
    C: ResultCache + 'static,
{
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<A, C> CoordinatorInner<A, C>
where
    A: SearchApi,
    C: ResultCache,
{
    async fn fetch(&self, query: &SearchQuery) -> SearchResult<FetchOutcome> {
        let key = query.canonical_key()?;
        let request_id = Uuid::new_v4();

        // Check-and-mark under one lock so two triggers cannot both pass
        {
            let mut state = self.state.write().await;
            if state.phase.is_loading() {
                component_debug!(ComponentId::current(), "Search in flight, dropping trigger");
                return Ok(FetchOutcome::SkippedInFlight);
            }
            if state.last_key.as_ref() == Some(&key) {
                component_debug!(ComponentId::current(), "Query unchanged, skipping fetch");
                return Ok(FetchOutcome::SkippedDuplicate);
            }
            state.phase = FetchPhase::Loading {
                key: key.clone(),
                request_id,
            };
            state.requests_issued += 1;
        }

        let payload = build_payload(query);
        component_debug!(
            ComponentId::current(),
            request_id = %request_id,
            page = query.page(),
            term = query.free_text(),
            "🔎 Issuing search"
        );

        match self.api.search_college_courses(&payload).await {
            Ok(response) => {
                let items = map_batch(ListingSource::Backend, &response.data);
                let pagination = server_pagination(
                    response.pagination.as_ref(),
                    query.page(),
                    query.page_size(),
                    response.data.len(),
                );
                let page = ResultPage { items, pagination };
                let item_count = page.items.len();

                if let Err(e) = self.cache.store(&key, &page).await {
                    component_warn!(ComponentId::current(), error = %e, "Result cache write failed");
                }

                let mut state = self.state.write().await;
                state.phase = FetchPhase::Ready {
                    page,
                    from_cache: false,
                };
                state.last_key = Some(key);

                component_info!(
                    ComponentId::current(),
                    request_id = %request_id,
                    items = item_count,
                    "✅ Search completed"
                );
                Ok(FetchOutcome::Fetched { request_id, item_count })
            }
            Err(e) => {
                let message = e.to_string();
                let mut state = self.state.write().await;
                state.phase = FetchPhase::Failed {
                    page: ResultPage::empty(query.page_size()),
                    message: message.clone(),
                };
                // Not marked as served: the same query may be retried
                state.last_key = None;

                component_warn!(
                    ComponentId::current(),
                    request_id = %request_id,
                    error = %message,
                    "❌ Search failed, showing empty page"
                );
                Ok(FetchOutcome::Failed { request_id, message })
            }
        }
    }
}
