//! Course intake and registration library
//!
//! Drives the apply flow for one listing: intake month and year selection,
//! validation, the registration call and the durable record of a
//! successful registration. Also hosts the wishlist action.

pub mod core;
pub mod error;
pub mod flow;
pub mod services;
pub mod traits;
pub mod types;
pub mod wishlist;

// Re-export main types
pub use error::{IntakeError, IntakeResult};
pub use flow::{IntakeFlow, SELECTED_INTAKE_KEY, STUDENT_ID_KEY};
pub use traits::*;
pub use types::*;
pub use wishlist::WishlistService;

// Re-export service implementations
pub use services::{RealRegistrationApi, RealWishlistApi, SystemClock};
