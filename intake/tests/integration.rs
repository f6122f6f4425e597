//! Integration tests for intake
//!
//! These tests drive the intake flow and the wishlist service with mocked
//! collaborators and the in-memory store.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use fixtures::*;
use helpers::*;
use intake::{
    IntakeError, IntakeFlow, IntakeState, MockRegistrationApi, MockWishlistApi, Notice, WishlistOutcome,
    WishlistService, SELECTED_INTAKE_KEY, STUDENT_ID_KEY,
};
use serde_json::json;
use shared::{ActionGuard, KeyValueStore, MemoryStore, RegistrationResponse, WishlistResponse};

type TestFlow<R> = IntakeFlow<R, Arc<MemoryStore>, intake::MockClock>;

fn flow_with<R: intake::RegistrationApi>(api: R, store: &Arc<MemoryStore>, guard: ActionGuard) -> TestFlow<R> {
    IntakeFlow::new(api, Arc::clone(store), fixed_clock(today()), guard)
}

fn ready_for_sep_2025<R: intake::RegistrationApi>(flow: &mut TestFlow<R>, college_course_id: &str) {
    flow.open(pending_registration(college_course_id)).unwrap();
    flow.select_month("SEP").unwrap();
    flow.select_year(2025).unwrap();
}

#[tokio::test]
async fn test_zero_student_id_rejected_before_network() {
    let mut api = MockRegistrationApi::new();
    api.expect_start_course_registration().never();
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(api, &store, ActionGuard::new()).with_student_identifier("WC0");
    ready_for_sep_2025(&mut flow, "501");

    let err = flow.submit().await.unwrap_err();

    assert!(matches!(err, IntakeError::InvalidStudentId { .. }));
    assert!(err.is_validation());
    assert!(matches!(flow.state().notice(), Some(Notice::Validation(_))));
    assert!(matches!(flow.state(), IntakeState::ReadyToSubmit { .. }));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_non_numeric_college_course_id_rejected_before_network() {
    let mut api = MockRegistrationApi::new();
    api.expect_start_course_registration().never();
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(api, &store, ActionGuard::new()).with_student_identifier("WC1042");
    ready_for_sep_2025(&mut flow, "C-12");

    let err = flow.submit().await.unwrap_err();

    assert!(matches!(err, IntakeError::InvalidCollegeCourseId { .. }));
    assert!(matches!(flow.state().notice(), Some(Notice::Validation(_))));
}

#[tokio::test]
async fn test_successful_registration_is_stored_as_selected_intake() {
    let mut api = MockRegistrationApi::new();
    api.expect_start_course_registration()
        .withf(|request| {
            request.student_id == 1042
                && request.college_course_id == 501
                && request.intake_session == "SEP 2025"
                && request.remarks.as_deref() == Some("Evening classes preferred")
        })
        .times(1)
        .returning(|_| Ok(accepted(json!(981))));
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(api, &store, ActionGuard::new()).with_student_identifier("WC1042");
    ready_for_sep_2025(&mut flow, "501");
    flow.set_remarks("  Evening classes preferred ").unwrap();

    let record = flow.submit().await.unwrap();

    assert_eq!(record.registration_id, "981");
    assert_eq!(record.intake_session, "SEP 2025");
    assert!(matches!(flow.state(), IntakeState::Success { .. }));

    let stored = store.get(SELECTED_INTAKE_KEY).await.unwrap().unwrap();
    assert_eq!(stored["intakeSession"], "SEP 2025");
    assert_eq!(stored["registrationId"], "981");
    assert_eq!(stored["remarks"], "Evening classes preferred");

    // Success needs an explicit acknowledgement before closing
    assert!(flow.cancel().is_err());
    assert_eq!(flow.done().unwrap(), record);
    assert_eq!(flow.state(), &IntakeState::Closed);
}

#[tokio::test]
async fn test_student_id_read_from_store_when_not_given() {
    let mut api = MockRegistrationApi::new();
    api.expect_start_course_registration()
        .withf(|request| request.student_id == 77)
        .times(1)
        .returning(|_| Ok(accepted(json!("REG-77"))));
    let store = Arc::new(MemoryStore::new());
    store.set(STUDENT_ID_KEY, json!("WC77")).await.unwrap();
    let mut flow = flow_with(api, &store, ActionGuard::new());
    ready_for_sep_2025(&mut flow, "501");

    assert_eq!(flow.submit().await.unwrap().registration_id, "REG-77");
}

#[tokio::test]
async fn test_backend_failure_returns_to_confirmation_and_stores_nothing() {
    let mut api = MockRegistrationApi::new();
    let mut attempts = 0;
    api.expect_start_course_registration().times(2).returning(move |_| {
        attempts += 1;
        if attempts == 1 {
            Err(IntakeError::BackendError {
                status: Some(503),
                message: "service unavailable".to_string(),
            })
        } else {
            Ok(accepted(json!(5)))
        }
    });
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(api, &store, ActionGuard::new()).with_student_identifier("1042");
    ready_for_sep_2025(&mut flow, "501");

    assert!(flow.submit().await.is_err());
    assert!(matches!(flow.state().notice(), Some(Notice::Retryable(m)) if m.contains("service unavailable")));
    assert!(store.get(SELECTED_INTAKE_KEY).await.unwrap().is_none());

    let record = flow.submit().await.unwrap();
    assert_eq!(record.registration_id, "5");
    assert!(store.get(SELECTED_INTAKE_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unsuccessful_response_shows_backend_message() {
    let mut api = MockRegistrationApi::new();
    api.expect_start_course_registration().times(1).returning(|_| {
        Ok(RegistrationResponse {
            success: false,
            response: None,
            message: Some("Intake closed".to_string()),
        })
    });
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(api, &store, ActionGuard::new()).with_student_identifier("1042");
    ready_for_sep_2025(&mut flow, "501");

    let err = flow.submit().await.unwrap_err();

    assert!(!err.is_validation());
    assert_eq!(flow.state().notice().map(Notice::message), Some("Intake closed"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_past_intake_is_listed_but_not_selectable() {
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(MockRegistrationApi::new(), &store, ActionGuard::new());
    flow.open(pending_registration("501")).unwrap();

    let grid = flow.intake_grid();
    assert!(grid.iter().any(|o| o.session() == "JAN 2025" && !o.selectable));
    assert_eq!(flow.year_options(), vec![2025, 2026, 2027]);
    assert_eq!(flow.month_options(), vec!["JAN", "SEP"]);

    flow.select_month("JAN").unwrap();
    assert!(matches!(flow.select_year(2025), Err(IntakeError::IntakeNotSelectable { .. })));
    flow.select_year(2026).unwrap();
    assert!(matches!(flow.state(), IntakeState::ReadyToSubmit { year: 2026, .. }));
}

#[tokio::test]
async fn test_cancel_discards_selection_without_side_effects() {
    let mut api = MockRegistrationApi::new();
    api.expect_start_course_registration().never();
    let store = Arc::new(MemoryStore::new());
    let mut flow = flow_with(api, &store, ActionGuard::new());
    ready_for_sep_2025(&mut flow, "501");
    flow.set_remarks("note").unwrap();

    flow.cancel().unwrap();

    assert_eq!(flow.state(), &IntakeState::Closed);
    assert!(flow.remarks().is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_repeat_submit_for_same_course_is_refused_while_outstanding() {
    let api = SlowApi::new(Duration::from_millis(150));
    let store = Arc::new(MemoryStore::new());
    let guard = ActionGuard::new();

    let mut first = flow_with(api.clone(), &store, guard.clone()).with_student_identifier("1042");
    let mut second = flow_with(api.clone(), &store, guard.clone()).with_student_identifier("1042");
    let mut other = flow_with(api.clone(), &store, guard.clone()).with_student_identifier("1042");
    ready_for_sep_2025(&mut first, "501");
    ready_for_sep_2025(&mut second, "501");
    ready_for_sep_2025(&mut other, "777");

    let (a, b, c) = tokio::join!(first.submit(), second.submit(), other.submit());

    assert!(a.is_ok());
    assert!(matches!(b, Err(IntakeError::AlreadyInFlight { .. })));
    assert!(c.is_ok());
    assert_eq!(api.calls(), 2);
    assert_eq!(guard.active_count(), 0);

    // Released after completion
    assert!(matches!(second.state(), IntakeState::ReadyToSubmit { .. }));
    assert!(second.submit().await.is_ok());
}

#[tokio::test]
async fn test_wishlist_add_marks_listing_favorited() {
    let mut api = MockWishlistApi::new();
    api.expect_add_wishlist_item()
        .withf(|student_id, course_id| *student_id == 1042 && course_id == "C-12")
        .times(1)
        .returning(|_, _| {
            Ok(WishlistResponse {
                success: true,
                message: None,
            })
        });
    let service = WishlistService::new(api, ActionGuard::new());
    let mut item = listing("C-12");

    assert_eq!(service.add("WC1042", &mut item).await.unwrap(), WishlistOutcome::Added);
    assert!(item.is_favorited);
}

#[tokio::test]
async fn test_duplicate_wishlist_add_is_soft_success() {
    let mut api = MockWishlistApi::new();
    api.expect_add_wishlist_item().times(1).returning(|_, _| {
        Ok(WishlistResponse {
            success: false,
            message: Some("Course Already In Wishlist".to_string()),
        })
    });
    let service = WishlistService::new(api, ActionGuard::new());
    let mut item = listing("C-12");

    assert_eq!(service.add("WC1042", &mut item).await.unwrap(), WishlistOutcome::AlreadyPresent);
    assert!(item.is_favorited);
}

#[tokio::test]
async fn test_wishlist_failure_leaves_listing_untouched() {
    let mut api = MockWishlistApi::new();
    api.expect_add_wishlist_item().times(1).returning(|_, _| {
        Err(IntakeError::BackendError {
            status: Some(500),
            message: "boom".to_string(),
        })
    });
    let service = WishlistService::new(api, ActionGuard::new());
    let mut item = listing("C-12");

    assert!(service.add("WC1042", &mut item).await.is_err());
    assert!(!item.is_favorited);

    let mut unused = MockWishlistApi::new();
    unused.expect_add_wishlist_item().never();
    let service = WishlistService::new(unused, ActionGuard::new());
    assert!(matches!(
        service.add("WC0", &mut item).await,
        Err(IntakeError::InvalidStudentId { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_wishlist_adds_guarded_per_course() {
    let api = SlowApi::new(Duration::from_millis(100));
    let service = WishlistService::new(api.clone(), ActionGuard::new());
    let mut a = listing("C-12");
    let mut b = listing("C-12");
    let mut c = listing("C-99");

    let (ra, rb, rc) = tokio::join!(
        service.add("1042", &mut a),
        service.add("1042", &mut b),
        service.add("1042", &mut c)
    );

    assert!(ra.is_ok());
    assert!(matches!(rb, Err(IntakeError::AlreadyInFlight { .. })));
    assert!(rc.is_ok());
    assert!(!b.is_favorited);
    assert_eq!(api.calls(), 2);
}
