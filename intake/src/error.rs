//! Error types for the intake component

use thiserror::Error;

use shared::SharedError;

/// Result type for intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Errors raised by the intake flow and its collaborators
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Invalid student id: {value:?}")]
    InvalidStudentId { value: String },

    #[error("Invalid college course id: {value:?}")]
    InvalidCollegeCourseId { value: String },

    #[error("Intake month not offered: {month}")]
    UnknownMonth { month: String },

    #[error("Intake {month} {year} is not selectable")]
    IntakeNotSelectable { month: String, year: i32 },

    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: &'static str },

    #[error("Action already in progress for {id}")]
    AlreadyInFlight { id: String },

    #[error("Backend rejected request: {message}")]
    BackendError { status: Option<u16>, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StoreError(#[from] SharedError),
}

impl IntakeError {
    /// Errors raised before any collaborator is called
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IntakeError::InvalidStudentId { .. }
                | IntakeError::InvalidCollegeCourseId { .. }
                | IntakeError::UnknownMonth { .. }
                | IntakeError::IntakeNotSelectable { .. }
                | IntakeError::InvalidTransition { .. }
        )
    }
}
