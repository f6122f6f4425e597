//! Wishlist action for a rendered listing

use shared::logging::ComponentId;
use shared::{component_debug, component_info, ActionGuard, CourseListing};
use crate::core::validation::parse_student_id;
use crate::error::{IntakeError, IntakeResult};
use crate::traits::WishlistApi;
use crate::types::WishlistOutcome;

/// Backend message marking a duplicate add
const ALREADY_IN_WISHLIST: &str = "already in wishlist";

fn is_duplicate_add(message: &str) -> bool {
    message.to_lowercase().contains(ALREADY_IN_WISHLIST)
}

pub struct WishlistService<W: WishlistApi> {
    api: W,
    guard: ActionGuard,
}

impl<W: WishlistApi> WishlistService<W> {
    pub fn new(api: W, guard: ActionGuard) -> Self {
        Self { api, guard }
    }

    /// Add a listing to the student's wishlist and mark it favorited
    ///
    /// A duplicate add counts as success. Only one add per course runs at a
    /// time.
    pub async fn add(&self, student_identifier: &str, listing: &mut CourseListing) -> IntakeResult<WishlistOutcome> {
        let student_id = parse_student_id(student_identifier)?;
        let course_id = listing.id.course_id.clone();

        let guard_id = format!("wishlist:{course_id}");
        let Some(_ticket) = self.guard.try_acquire(guard_id.clone()) else {
            return Err(IntakeError::AlreadyInFlight { id: guard_id });
        };

        let outcome = match self.api.add_wishlist_item(student_id, &course_id).await {
            Ok(response) if response.success => WishlistOutcome::Added,
            Ok(response) if response.message.as_deref().is_some_and(is_duplicate_add) => {
                WishlistOutcome::AlreadyPresent
            }
            Ok(response) => {
                return Err(IntakeError::BackendError {
                    status: None,
                    message: response
                        .message
                        .unwrap_or_else(|| "Could not add to wishlist".to_string()),
                })
            }
            Err(IntakeError::BackendError { message, .. }) if is_duplicate_add(&message) => {
                WishlistOutcome::AlreadyPresent
            }
            Err(e) => return Err(e),
        };

        listing.is_favorited = true;
        match outcome {
            WishlistOutcome::Added => {
                component_info!(ComponentId::current(), course_id = %course_id, "❤️ Added to wishlist");
            }
            WishlistOutcome::AlreadyPresent => {
                component_debug!(ComponentId::current(), course_id = %course_id, "Course already wishlisted");
            }
        }
        Ok(outcome)
    }
}
