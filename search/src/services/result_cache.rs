//! Durable result cache on top of the key-value store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use shared::logging::ComponentId;
use shared::{component_debug, component_warn, KeyValueStore, ListingSource, PaginationMeta, ResultPage};
use crate::core::mapper::map_batch;
use crate::error::SearchResult;
use crate::traits::ResultCache;
use crate::types::CanonicalKey;

/// Fixed store key of the single result slot
pub const RESULTS_CACHE_KEY: &str = "search_results_cache";

/// Store key listing every per-query slot written under the keyed policy
const KEYED_INDEX_KEY: &str = "search_results_cache_index";

/// How cached pages are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// One slot holding the last successful page, whatever its query
    #[default]
    SingleSlot,
    /// One slot per canonical query key
    KeyedByQuery,
}

/// Stored blob shape: `{data, pagination}`
#[derive(Serialize, Deserialize, Debug)]
struct CachedResults {
    data: Vec<serde_json::Value>,
    pagination: PaginationMeta,
}

/// Result cache writing JSON blobs through a `KeyValueStore`
pub struct RealResultCache<S: KeyValueStore> {
    store: S,
    policy: CachePolicy,
}

impl<S: KeyValueStore> RealResultCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, CachePolicy::default())
    }

    pub fn with_policy(store: S, policy: CachePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn slot(&self, key: &CanonicalKey) -> String {
        match self.policy {
            CachePolicy::SingleSlot => RESULTS_CACHE_KEY.to_string(),
            CachePolicy::KeyedByQuery => format!("{RESULTS_CACHE_KEY}_{}", key.digest()),
        }
    }

    async fn keyed_slots(&self) -> SearchResult<Vec<String>> {
        match self.store.get(KEYED_INDEX_KEY).await? {
            Some(index) => Ok(serde_json::from_value(index).unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    async fn remember_slot(&self, slot: &str) -> SearchResult<()> {
        let mut slots = self.keyed_slots().await?;
        if !slots.iter().any(|s| s == slot) {
            slots.push(slot.to_string());
            self.store.set(KEYED_INDEX_KEY, serde_json::to_value(&slots)?).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> ResultCache for RealResultCache<S> {
    async fn load(&self, key: &CanonicalKey) -> SearchResult<Option<ResultPage>> {
        let slot = self.slot(key);
        let blob = match self.store.get(&slot).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(None),
            Err(e) => {
                component_warn!(ComponentId::current(), slot = %slot, error = %e, "Unreadable result cache, treating as miss");
                return Ok(None);
            }
        };

        let cached: CachedResults = match serde_json::from_value(blob) {
            Ok(cached) => cached,
            Err(e) => {
                component_warn!(ComponentId::current(), slot = %slot, error = %e, "Malformed result cache blob, treating as miss");
                return Ok(None);
            }
        };

        let items = map_batch(ListingSource::CachedSnapshot, &cached.data);
        component_debug!(ComponentId::current(), slot = %slot, items = items.len(), "Restored cached result page");
        Ok(Some(ResultPage {
            items,
            pagination: cached.pagination,
        }))
    }

    async fn store(&self, key: &CanonicalKey, page: &ResultPage) -> SearchResult<()> {
        let blob = CachedResults {
            data: page
                .items
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?,
            pagination: page.pagination,
        };
        let slot = self.slot(key);
        self.store.set(&slot, serde_json::to_value(&blob)?).await?;
        if self.policy == CachePolicy::KeyedByQuery {
            self.remember_slot(&slot).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> SearchResult<()> {
        for slot in self.keyed_slots().await? {
            self.store.clear(&slot).await?;
        }
        self.store.clear(KEYED_INDEX_KEY).await?;
        self.store.clear(RESULTS_CACHE_KEY).await?;
        Ok(())
    }
}
