//! Tests for search services
//!
//! The HTTP collaborator runs against a wiremock server; the result cache
//! runs against the in-memory and file-backed stores.

pub mod search_api;
