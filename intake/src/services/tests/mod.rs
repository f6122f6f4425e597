//! Tests for intake services
//!
//! HTTP collaborators run against a wiremock server.

pub mod wishlist_api;
