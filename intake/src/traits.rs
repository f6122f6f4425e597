//! Collaborator trait definitions for dependency injection

use async_trait::async_trait;
use chrono::NaiveDate;

use shared::{RegistrationRequest, RegistrationResponse, WishlistResponse};
use crate::error::IntakeResult;

/// Registration collaborator
#[mockall::automock]
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Start a registration for one course and intake session
    ///
    /// An unsuccessful but well-formed answer is returned as `Ok` with
    /// `success == false`.
    async fn start_course_registration(&self, request: &RegistrationRequest) -> IntakeResult<RegistrationResponse>;
}

/// Wishlist collaborator
#[mockall::automock]
#[async_trait]
pub trait WishlistApi: Send + Sync {
    async fn add_wishlist_item(&self, student_id: u64, course_id: &str) -> IntakeResult<WishlistResponse>;
}

/// Source of the current date for intake validity checks
#[mockall::automock]
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
