//! Search services implementations

pub mod result_cache;
pub mod search_api;

#[cfg(test)]
pub mod tests;

pub use result_cache::*;
pub use search_api::*;
