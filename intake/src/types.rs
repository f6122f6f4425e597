//! Intake flow types

use serde::{Deserialize, Serialize};

use shared::{PendingRegistration, RegistrationRecord};

/// Message shown inside the intake modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// Input problem; fixing the input is required before retrying
    Validation(String),
    /// Collaborator failure; the same submission may be retried
    Retryable(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(message) | Notice::Retryable(message) => message,
        }
    }
}

/// State of the intake modal
///
/// Each open state carries the registration context, so a modal can never
/// be open without a listing or submitting without a complete selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IntakeState {
    #[default]
    Closed,
    SelectingMonth {
        pending: PendingRegistration,
    },
    SelectingYear {
        pending: PendingRegistration,
        month: String,
    },
    ReadyToSubmit {
        pending: PendingRegistration,
        month: String,
        year: i32,
        notice: Option<Notice>,
    },
    Submitting {
        pending: PendingRegistration,
        month: String,
        year: i32,
    },
    Success {
        pending: PendingRegistration,
        record: RegistrationRecord,
    },
}

impl IntakeState {
    pub fn name(&self) -> &'static str {
        match self {
            IntakeState::Closed => "closed",
            IntakeState::SelectingMonth { .. } => "selecting month",
            IntakeState::SelectingYear { .. } => "selecting year",
            IntakeState::ReadyToSubmit { .. } => "ready to submit",
            IntakeState::Submitting { .. } => "submitting",
            IntakeState::Success { .. } => "registered",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, IntakeState::Closed)
    }

    /// Escape, outside click and cancel are ignored while submitting
    pub fn can_dismiss(&self) -> bool {
        !matches!(self, IntakeState::Submitting { .. })
    }

    pub fn pending(&self) -> Option<&PendingRegistration> {
        match self {
            IntakeState::Closed => None,
            IntakeState::SelectingMonth { pending }
            | IntakeState::SelectingYear { pending, .. }
            | IntakeState::ReadyToSubmit { pending, .. }
            | IntakeState::Submitting { pending, .. }
            | IntakeState::Success { pending, .. } => Some(pending),
        }
    }

    pub fn selected_month(&self) -> Option<&str> {
        match self {
            IntakeState::SelectingYear { month, .. }
            | IntakeState::ReadyToSubmit { month, .. }
            | IntakeState::Submitting { month, .. } => Some(month),
            _ => None,
        }
    }

    pub fn selected_year(&self) -> Option<i32> {
        match self {
            IntakeState::ReadyToSubmit { year, .. } | IntakeState::Submitting { year, .. } => Some(*year),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            IntakeState::ReadyToSubmit { notice, .. } => notice.as_ref(),
            _ => None,
        }
    }
}

/// One cell of the month/year picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeOption {
    pub month: String,
    pub year: i32,
    /// Past intakes are listed but cannot be picked
    pub selectable: bool,
}

impl IntakeOption {
    pub fn session(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// Everything the registration call needs, captured when submitting starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitDraft {
    pub pending: PendingRegistration,
    pub month: String,
    pub year: i32,
    pub remarks: Option<String>,
}

impl SubmitDraft {
    /// Session label sent to the backend, e.g. "SEP 2025"
    pub fn intake_session(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// Result of a wishlist add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WishlistOutcome {
    Added,
    /// Backend reported the course as already wishlisted
    AlreadyPresent,
}
