//! Shared types for the course search client
//!
//! Contains the domain entities, backend wire messages, durable storage and
//! per-entity action guards used by both the search and intake components.

pub mod config;
pub mod errors;
pub mod guard;
pub mod logging;
pub mod messages;
pub mod store;
pub mod types;

pub use config::ClientConfig;
pub use errors::*;
pub use guard::{ActionGuard, ActionTicket};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;

// Re-export backend contract messages
pub use messages::{
    // Search collaborator
    BackendPagination, DurationMonths, FilterPayload, PagePayload, SearchPayload, SearchResponse,
    SearchTerm,

    // Registration and wishlist collaborators
    RegistrationAck, RegistrationRequest, RegistrationResponse, WishlistRequest,
    WishlistResponse,
};
