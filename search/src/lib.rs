//! Course search orchestration library
//!
//! Turns free text and structured filters into backend queries, coordinates
//! the request lifecycle (debounce, de-duplication, caching, fallback) and
//! reconciles server- and client-driven pagination into one page contract.

pub mod coordinator;
pub mod core;
pub mod error;
pub mod services;
pub mod session;
pub mod traits;
pub mod types;

// Re-export main types
pub use coordinator::FetchCoordinator;
pub use error::{SearchError, SearchResult};
pub use session::{ListingView, SearchSession};
pub use traits::*;
pub use types::*;

// Re-export service implementations
pub use services::{CachePolicy, RealResultCache, RealSearchApi, RESULTS_CACHE_KEY};
