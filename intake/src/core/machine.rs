//! Intake modal state machine
//!
//! `Closed → SelectingMonth → SelectingYear → ReadyToSubmit → Submitting →
//! Success`, with a failed submission returning to `ReadyToSubmit`. Every
//! transition checks the current state and leaves it untouched on error.

use chrono::NaiveDate;

use shared::{month_number, PendingRegistration, RegistrationRecord};
use crate::core::calendar::{available_months, is_past_intake, year_options};
use crate::core::validation::clamp_remarks;
use crate::error::{IntakeError, IntakeResult};
use crate::types::{IntakeState, Notice, SubmitDraft};

#[derive(Debug, Clone, Default)]
pub struct IntakeMachine {
    state: IntakeState,
    remarks: Option<String>,
}

impl IntakeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn invalid(&self, action: &'static str) -> IntakeError {
        IntakeError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// "Apply" on a listing
    pub fn open(&mut self, pending: PendingRegistration) -> IntakeResult<()> {
        if self.state.is_open() {
            return Err(self.invalid("open"));
        }
        self.remarks = None;
        self.state = IntakeState::SelectingMonth { pending };
        Ok(())
    }

    /// Pick a month code (e.g. "SEP"); the year is picked next
    pub fn select_month(&mut self, month: &str) -> IntakeResult<()> {
        let pending = match &self.state {
            IntakeState::SelectingMonth { pending }
            | IntakeState::SelectingYear { pending, .. }
            | IntakeState::ReadyToSubmit { pending, .. } => pending,
            _ => return Err(self.invalid("select a month")),
        };

        let code = month.trim().to_uppercase();
        if month_number(&code).is_none() || !available_months(pending).contains(&code) {
            return Err(IntakeError::UnknownMonth { month: month.to_string() });
        }

        self.state = IntakeState::SelectingYear {
            pending: pending.clone(),
            month: code,
        };
        Ok(())
    }

    /// Pick the year for the selected month; past intakes are refused
    pub fn select_year(&mut self, year: i32, today: NaiveDate) -> IntakeResult<()> {
        let (pending, month) = match &self.state {
            IntakeState::SelectingYear { pending, month } | IntakeState::ReadyToSubmit { pending, month, .. } => {
                (pending, month)
            }
            _ => return Err(self.invalid("select a year")),
        };

        let offered = year_options(today).contains(&year);
        let past = month_number(month).map_or(true, |m| is_past_intake(m, year, today));
        if !offered || past {
            return Err(IntakeError::IntakeNotSelectable {
                month: month.clone(),
                year,
            });
        }

        self.state = IntakeState::ReadyToSubmit {
            pending: pending.clone(),
            month: month.clone(),
            year,
            notice: None,
        };
        Ok(())
    }

    /// Step back one selection
    pub fn back(&mut self) -> IntakeResult<()> {
        self.state = match &self.state {
            IntakeState::SelectingYear { pending, .. } => IntakeState::SelectingMonth {
                pending: pending.clone(),
            },
            IntakeState::ReadyToSubmit { pending, month, .. } => IntakeState::SelectingYear {
                pending: pending.clone(),
                month: month.clone(),
            },
            _ => return Err(self.invalid("go back")),
        };
        Ok(())
    }

    pub fn set_remarks(&mut self, raw: &str) -> IntakeResult<()> {
        match self.state {
            IntakeState::SelectingMonth { .. }
            | IntakeState::SelectingYear { .. }
            | IntakeState::ReadyToSubmit { .. } => {
                self.remarks = clamp_remarks(raw);
                Ok(())
            }
            _ => Err(self.invalid("edit remarks")),
        }
    }

    /// Show a notice on the confirmation step
    pub fn notify(&mut self, message: Notice) -> IntakeResult<()> {
        match &mut self.state {
            IntakeState::ReadyToSubmit { notice, .. } => {
                *notice = Some(message);
                Ok(())
            }
            _ => Err(self.invalid("show a notice")),
        }
    }

    /// Snapshot of the confirmed selection
    pub fn draft(&self) -> IntakeResult<SubmitDraft> {
        match &self.state {
            IntakeState::ReadyToSubmit { pending, month, year, .. } => Ok(SubmitDraft {
                pending: pending.clone(),
                month: month.clone(),
                year: *year,
                remarks: self.remarks.clone(),
            }),
            _ => Err(self.invalid("submit")),
        }
    }

    /// Confirm: enter `Submitting` and hand out what the call needs
    pub fn begin_submit(&mut self) -> IntakeResult<SubmitDraft> {
        let draft = self.draft()?;
        self.state = IntakeState::Submitting {
            pending: draft.pending.clone(),
            month: draft.month.clone(),
            year: draft.year,
        };
        Ok(draft)
    }

    pub fn complete(&mut self, record: RegistrationRecord) -> IntakeResult<()> {
        match &self.state {
            IntakeState::Submitting { pending, .. } => {
                self.state = IntakeState::Success {
                    pending: pending.clone(),
                    record,
                };
                Ok(())
            }
            _ => Err(self.invalid("complete a registration")),
        }
    }

    /// Back to the confirmation step with a retryable notice
    pub fn fail(&mut self, message: impl Into<String>) -> IntakeResult<()> {
        match &self.state {
            IntakeState::Submitting { pending, month, year } => {
                self.state = IntakeState::ReadyToSubmit {
                    pending: pending.clone(),
                    month: month.clone(),
                    year: *year,
                    notice: Some(Notice::Retryable(message.into())),
                };
                Ok(())
            }
            _ => Err(self.invalid("fail a registration")),
        }
    }

    /// Dismiss the modal and discard the selection
    ///
    /// Refused while submitting and after success, which needs `done`.
    pub fn cancel(&mut self) -> IntakeResult<()> {
        match self.state {
            IntakeState::Closed => Ok(()),
            IntakeState::SelectingMonth { .. }
            | IntakeState::SelectingYear { .. }
            | IntakeState::ReadyToSubmit { .. } => {
                self.close();
                Ok(())
            }
            IntakeState::Submitting { .. } | IntakeState::Success { .. } => Err(self.invalid("cancel")),
        }
    }

    /// Acknowledge a successful registration and close
    pub fn done(&mut self) -> IntakeResult<RegistrationRecord> {
        match &self.state {
            IntakeState::Success { record, .. } => {
                let record = record.clone();
                self.close();
                Ok(record)
            }
            _ => Err(self.invalid("finish")),
        }
    }

    fn close(&mut self) {
        self.state = IntakeState::Closed;
        self.remarks = None;
    }
}
