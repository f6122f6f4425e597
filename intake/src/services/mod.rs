//! Intake services implementations

pub mod clock;
pub mod registration_api;
pub mod wishlist_api;

#[cfg(test)]
pub mod tests;

pub use clock::*;
pub use registration_api::*;
pub use wishlist_api::*;
