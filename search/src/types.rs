//! Search-specific data types

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{FilterState, ResultPage, Vertical};
use crate::error::{SearchError, SearchResult};

/// Deterministic serialization of the logically relevant query fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable 64-bit FNV-1a digest, used to name per-query cache slots
    pub fn digest(&self) -> String {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in self.0.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        format!("{hash:016x}")
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable snapshot of one search attempt
///
/// Field order is the serialization order of the canonical key; sets are
/// ordered, so equal logical input always serializes identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    vertical: Vertical,
    free_text: String,
    filters: FilterState,
    page: u32,
    page_size: u32,
    intake_param: Option<String>,
}

impl SearchQuery {
    pub fn new(vertical: Vertical, free_text: &str, filters: FilterState, page: u32, page_size: u32) -> Self {
        Self {
            vertical,
            free_text: free_text.trim().to_string(),
            filters,
            page: page.max(1),
            page_size: page_size.max(1),
            intake_param: None,
        }
    }

    /// Attach the `intake` URL parameter, which overrides filter intakes
    pub fn with_intake_param(mut self, intake: Option<&str>) -> Self {
        self.intake_param = intake
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self
    }

    /// Same selections on another page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
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

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn intake_param(&self) -> Option<&str> {
        self.intake_param.as_deref()
    }

    pub fn canonical_key(&self) -> SearchResult<CanonicalKey> {
        Ok(CanonicalKey(serde_json::to_string(self)?))
    }
}

/// Lifecycle of the fetch coordinator
///
/// Results are only reachable from `Ready` and `Failed`, so a loading phase
/// can never expose a stale page.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPhase {
    /// Nothing fetched or restored yet
    Idle,
    /// One request is outstanding
    Loading { key: CanonicalKey, request_id: Uuid },
    /// Last request succeeded, or a cached page was restored on mount
    Ready { page: ResultPage, from_cache: bool },
    /// Last request failed; the page is the explicit empty page
    Failed { page: ResultPage, message: String },
}

impl FetchPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchPhase::Loading { .. })
    }

    /// Page to render, if the phase has one
    pub fn page(&self) -> Option<&ResultPage> {
        match self {
            FetchPhase::Ready { page, .. } | FetchPhase::Failed { page, .. } => Some(page),
            FetchPhase::Idle | FetchPhase::Loading { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchPhase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// What the coordinator decided to do with one trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Request issued and page replaced
    Fetched { request_id: Uuid, item_count: usize },
    /// Same key as the last served request
    SkippedDuplicate,
    /// Another request is still outstanding
    SkippedInFlight,
    /// Request issued and failed; empty page shown
    Failed { request_id: Uuid, message: String },
}

/// One entry of the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => write!(f, "..."),
        }
    }
}

/// Where pagination metadata comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaginationMode {
    /// Backend metadata is authoritative
    ServerDriven,
    /// Computed from a fully loaded in-memory list
    ClientDriven,
}

/// Result of a page-change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// Clamped page equals the current page
    Unchanged,
    Changed {
        page: u32,
        refetch: bool,
        scroll_to_top: bool,
    },
}

/// Listing order for client-driven verticals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Dataset order
    #[default]
    Relevance,
    FeeLowToHigh,
    FeeHighToLow,
    RankingBest,
    RatingBest,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "relevance" | "" => Ok(SortOrder::Relevance),
            "fee_low_to_high" | "fee_asc" => Ok(SortOrder::FeeLowToHigh),
            "fee_high_to_low" | "fee_desc" => Ok(SortOrder::FeeHighToLow),
            "ranking" | "ranking_best" => Ok(SortOrder::RankingBest),
            "rating" | "rating_best" => Ok(SortOrder::RatingBest),
            _ => Err(format!("Unknown sort order: {s}")),
        }
    }
}

/// Initial search state seeded from incoming URL query parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParams {
    pub vertical: Vertical,
    pub query: String,
    pub country: Option<String>,
    pub level: Option<String>,
    pub intake: Option<String>,
}

impl SearchParams {
    /// Parse `vertical, q, country, level, intake` from a URL query string
    ///
    /// A leading `?` is accepted. Unknown parameters are ignored; an unknown
    /// vertical is an error.
    pub fn from_query_string(query: &str) -> SearchResult<Self> {
        let mut params = Self::default();
        let raw = query.trim().trim_start_matches('?');

        for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let value = value.trim().to_string();
            match name.as_ref() {
                "vertical" if !value.is_empty() => {
                    params.vertical = value
                        .parse()
                        .map_err(|message| SearchError::InvalidQuery { message })?;
                }
                "q" => params.query = value,
                "country" if !value.is_empty() => params.country = Some(value),
                "level" if !value.is_empty() => params.level = Some(value),
                "intake" if !value.is_empty() => params.intake = Some(value),
                _ => {}
            }
        }

        Ok(params)
    }

    /// Initial filter selections for the page session
    pub fn initial_filters(&self) -> FilterState {
        let mut filters = FilterState::new();
        if let Some(country) = &self.country {
            filters.countries.insert(country.clone());
        }
        if let Some(level) = &self.level {
            filters.levels.insert(level.clone());
        }
        filters
    }
}
