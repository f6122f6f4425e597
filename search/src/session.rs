//! Search page session
//!
//! Holds the user's current selections for one results view and turns every
//! change into the right effect: a debounced fetch for backend-driven
//! verticals, an in-memory filter and slice for the static ones.

use serde::Serialize;

use shared::logging::ComponentId;
use shared::{
    component_debug, component_info, CourseListing, FilterState, ListingId, ListingSource, PaginationMeta,
    PendingRegistration, ResultPage, Vertical,
};
use crate::coordinator::FetchCoordinator;
use crate::core::listing_filter::apply_client_filters;
use crate::core::mapper::map_batch;
use crate::core::pagination::{client_slice, page_numbers, range_summary, PageControl};
use crate::error::SearchResult;
use crate::traits::{ResultCache, SearchApi};
use crate::types::{FetchOutcome, FetchPhase, PageChange, PageItem, PaginationMode, SearchParams, SearchQuery, SortOrder};

/// Everything needed to render the results area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub items: Vec<CourseListing>,
    pub pagination: PaginationMeta,
    pub page_numbers: Vec<PageItem>,
    pub mode: PaginationMode,
    pub loading: bool,
    pub error: Option<String>,
    pub summary: String,
}

/// One results view and its selections
pub struct SearchSession<A, C>
where
    A: SearchApi + 'static,
    C: ResultCache + 'static,
{
    vertical: Vertical,
    free_text: String,
    filters: FilterState,
    intake_param: Option<String>,
    page_size: u32,
    sort: SortOrder,
    control: PageControl,
    coordinator: FetchCoordinator<A, C>,
    static_listings: Vec<CourseListing>,
}

impl<A, C> SearchSession<A, C>
where
    A: SearchApi + 'static,
    C: ResultCache + 'static,
{
    /// Seed a session from incoming URL parameters
    pub fn new(params: &SearchParams, coordinator: FetchCoordinator<A, C>, page_size: u32) -> Self {
        let mode = if params.vertical.is_backend_driven() {
            PaginationMode::ServerDriven
        } else {
            PaginationMode::ClientDriven
        };

        Self {
            vertical: params.vertical,
            free_text: params.query.trim().to_string(),
            filters: params.initial_filters(),
            intake_param: params.intake.clone(),
            page_size: page_size.max(1),
            sort: SortOrder::default(),
            control: PageControl::new(mode),
            coordinator,
            static_listings: Vec::new(),
        }
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn current_page(&self) -> u32 {
        self.control.current_page()
    }

    pub fn mode(&self) -> PaginationMode {
        self.control.mode()
    }

    pub fn coordinator(&self) -> &FetchCoordinator<A, C> {
        &self.coordinator
    }

    /// Snapshot of the selections as a search query
    pub fn current_query(&self) -> SearchQuery {
        SearchQuery::new(
            self.vertical,
            &self.free_text,
            self.filters.clone(),
            self.control.current_page(),
            self.page_size,
        )
        .with_intake_param(self.intake_param.as_deref())
    }

    /// Mount the view: show the cached page, then trigger the first fetch
    ///
    /// The session moves to the restored page number, so when the cached
    /// page belongs to the current selections the triggered fetch is
    /// skipped as a duplicate.
    pub async fn mount(&mut self) -> SearchResult<Option<ResultPage>> {
        if self.mode() == PaginationMode::ClientDriven {
            return Ok(None);
        }

        let restored = self.coordinator.restore_from_cache(&self.current_query()).await?;
        if let Some(page) = &restored {
            self.control.sync(&page.pagination);
        }
        self.trigger();

        component_info!(
            ComponentId::current(),
            vertical = %self.vertical,
            restored = restored.is_some(),
            "Search view mounted"
        );
        Ok(restored)
    }

    /// Replace the free-text term; page goes back to 1
    pub fn set_free_text(&mut self, text: &str) {
        let text = text.trim();
        if text == self.free_text {
            return;
        }
        self.free_text = text.to_string();
        self.control.reset();
        self.trigger();
    }

    /// Replace all filter selections; page goes back to 1
    pub fn set_filters(&mut self, filters: FilterState) {
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        self.control.reset();
        self.trigger();
    }

    /// Reset filters to their defaults
    pub fn clear_filters(&mut self) {
        self.set_filters(FilterState::default());
    }

    /// Replace the intake constraint taken from the URL
    pub fn set_intake_param(&mut self, intake: Option<&str>) {
        let intake = intake.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        if intake == self.intake_param {
            return;
        }
        self.intake_param = intake;
        self.control.reset();
        self.trigger();
    }

    /// Change the sort order of client-driven listings
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Request a page; out-of-range requests are clamped
    pub async fn change_page(&mut self, requested: i64) -> PageChange {
        // Bounds come from what is rendered; the selected page stays ours
        let meta = self.current_meta().await;
        self.control.sync(&PaginationMeta {
            current_page: self.control.current_page(),
            ..meta
        });

        let change = self.control.request_page(requested);
        if let PageChange::Changed { page, refetch, .. } = change {
            component_debug!(ComponentId::current(), page = page, refetch = refetch, "Page changed");
            if refetch {
                self.trigger();
            }
        }
        change
    }

    /// Fetch the current query now, without waiting for the debounce window
    pub async fn refresh(&mut self) -> SearchResult<FetchOutcome> {
        self.coordinator.cancel_pending();
        let outcome = self.coordinator.fetch_now(&self.current_query()).await?;
        if let Some(page) = self.coordinator.visible_page().await {
            self.control.sync(&page.pagination);
        }
        Ok(outcome)
    }

    /// Load the raw static dataset used by client-driven verticals
    pub fn load_static_dataset(&mut self, universities: &[serde_json::Value]) -> usize {
        self.static_listings = map_batch(ListingSource::StaticDataset, universities);
        self.control.reset();
        component_info!(
            ComponentId::current(),
            listings = self.static_listings.len(),
            "Static dataset loaded"
        );
        self.static_listings.len()
    }

    /// Current results area
    pub async fn view(&self) -> ListingView {
        match self.mode() {
            PaginationMode::ServerDriven => self.server_view().await,
            PaginationMode::ClientDriven => self.client_view(),
        }
    }

    async fn server_view(&self) -> ListingView {
        let phase = self.coordinator.phase().await;
        let loading = phase.is_loading();
        let error = phase.error_message().map(str::to_string);

        let (items, pagination) = match phase {
            FetchPhase::Ready { page, .. } | FetchPhase::Failed { page, .. } => (page.items, page.pagination),
            FetchPhase::Idle | FetchPhase::Loading { .. } => (
                Vec::new(),
                PaginationMeta {
                    current_page: self.control.current_page(),
                    page_size: self.page_size,
                    total_pages: self.control.total_pages(),
                    total_items: 0,
                },
            ),
        };

        self.assemble(items, pagination, PaginationMode::ServerDriven, loading, error)
    }

    fn client_view(&self) -> ListingView {
        let matched = apply_client_filters(&self.static_listings, &self.free_text, &self.filters, self.sort);
        let (items, pagination) = client_slice(&matched, self.control.current_page(), self.page_size);
        self.assemble(items, pagination, PaginationMode::ClientDriven, false, None)
    }

    fn assemble(
        &self,
        items: Vec<CourseListing>,
        pagination: PaginationMeta,
        mode: PaginationMode,
        loading: bool,
        error: Option<String>,
    ) -> ListingView {
        let summary = if loading {
            "Loading...".to_string()
        } else {
            range_summary(&pagination, items.len())
        };
        ListingView {
            page_numbers: page_numbers(pagination.current_page, pagination.total_pages),
            summary,
            items,
            pagination,
            mode,
            loading,
            error,
        }
    }

    /// Pagination metadata of what is currently rendered
    async fn current_meta(&self) -> PaginationMeta {
        match self.mode() {
            PaginationMode::ServerDriven => match self.coordinator.visible_page().await {
                Some(page) => page.pagination,
                None => PaginationMeta {
                    current_page: self.control.current_page(),
                    page_size: self.page_size,
                    total_pages: self.control.total_pages(),
                    total_items: 0,
                },
            },
            PaginationMode::ClientDriven => self.client_view().pagination,
        }
    }

    /// Flag a listing as favorited wherever it is rendered
    pub async fn mark_favorited(&mut self, id: &ListingId) -> bool {
        let mut found = false;
        for listing in self.static_listings.iter_mut().filter(|l| &l.id == id) {
            listing.is_favorited = true;
            found = true;
        }

        let target = id.clone();
        let mut in_page = false;
        self.coordinator
            .update_items(|items| {
                for listing in items.iter_mut().filter(|l| l.id == target) {
                    listing.is_favorited = true;
                    in_page = true;
                }
            })
            .await;

        found || in_page
    }

    /// Registration context for a rendered listing, if it is on screen
    pub async fn apply(&self, id: &ListingId) -> Option<PendingRegistration> {
        self.view()
            .await
            .items
            .iter()
            .find(|listing| &listing.id == id)
            .map(PendingRegistration::from_listing)
    }

    /// Tear down the view
    pub fn shutdown(&self) {
        self.coordinator.shutdown();
    }

    fn trigger(&self) {
        if self.mode() == PaginationMode::ServerDriven {
            self.coordinator.schedule(self.current_query());
        }
    }
}
