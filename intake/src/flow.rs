//! Intake flow with dependency injection
//!
//! Wraps the modal state machine with the side effects of an apply: reading
//! the stored student identifier, the guarded registration call and the
//! durable record of a successful registration.

use chrono::NaiveDate;
use serde_json::Value;

use shared::logging::ComponentId;
use shared::{
    component_info, component_warn, ActionGuard, KeyValueStore, PendingRegistration, RegistrationAck,
    RegistrationRecord, RegistrationRequest,
};
use crate::core::calendar::{available_months, intake_grid, year_options};
use crate::core::machine::IntakeMachine;
use crate::core::validation::{parse_college_course_id, parse_student_id};
use crate::error::{IntakeError, IntakeResult};
use crate::traits::{Clock, RegistrationApi};
use crate::types::{IntakeOption, IntakeState, Notice, SubmitDraft};

/// Store key of the last successful registration
pub const SELECTED_INTAKE_KEY: &str = "selected_intake";

/// Store key of the signed-in student's identifier
pub const STUDENT_ID_KEY: &str = "student_id";

pub struct IntakeFlow<R, S, K>
where
    R: RegistrationApi,
    S: KeyValueStore,
    K: Clock,
{
    machine: IntakeMachine,
    api: R,
    store: S,
    clock: K,
    guard: ActionGuard,
    student_identifier: Option<String>,
}

impl<R, S, K> IntakeFlow<R, S, K>
where
    R: RegistrationApi,
    S: KeyValueStore,
    K: Clock,
{
    /// Create new flow instance
    ///
    /// Flows sharing one `ActionGuard` refuse concurrent submits for the
    /// same college course.
    pub fn new(api: R, store: S, clock: K, guard: ActionGuard) -> Self {
        Self {
            machine: IntakeMachine::new(),
            api,
            store,
            clock,
            guard,
            student_identifier: None,
        }
    }

    /// Use this identifier instead of the one in the store
    pub fn with_student_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.student_identifier = Some(identifier.into());
        self
    }

    pub fn state(&self) -> &IntakeState {
        self.machine.state()
    }

    pub fn remarks(&self) -> Option<&str> {
        self.machine.remarks()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn open(&mut self, pending: PendingRegistration) -> IntakeResult<()> {
        component_info!(
            ComponentId::current(),
            course = %pending.course_name,
            college_course_id = %pending.college_course_id,
            "Intake selection opened"
        );
        self.machine.open(pending)
    }

    /// Month codes offered for the open listing
    pub fn month_options(&self) -> Vec<String> {
        self.state().pending().map(available_months).unwrap_or_default()
    }

    pub fn year_options(&self) -> Vec<i32> {
        year_options(self.today())
    }

    /// Full picker grid with past pairs marked unselectable
    pub fn intake_grid(&self) -> Vec<IntakeOption> {
        self.state()
            .pending()
            .map(|pending| intake_grid(pending, self.today()))
            .unwrap_or_default()
    }

    pub fn select_month(&mut self, month: &str) -> IntakeResult<()> {
        self.machine.select_month(month)
    }

    pub fn select_year(&mut self, year: i32) -> IntakeResult<()> {
        let today = self.today();
        self.machine.select_year(year, today)
    }

    pub fn back(&mut self) -> IntakeResult<()> {
        self.machine.back()
    }

    pub fn set_remarks(&mut self, remarks: &str) -> IntakeResult<()> {
        self.machine.set_remarks(remarks)
    }

    pub fn cancel(&mut self) -> IntakeResult<()> {
        self.machine.cancel()
    }

    pub fn done(&mut self) -> IntakeResult<RegistrationRecord> {
        self.machine.done()
    }

    async fn student_id(&self) -> IntakeResult<u64> {
        let raw = match &self.student_identifier {
            Some(identifier) => identifier.clone(),
            None => match self.store.get(STUDENT_ID_KEY).await? {
                Some(Value::String(identifier)) => identifier,
                Some(Value::Number(number)) => number.to_string(),
                _ => String::new(),
            },
        };
        parse_student_id(&raw)
    }

    async fn validate(&self, draft: &SubmitDraft) -> IntakeResult<(u64, u64)> {
        let student_id = self.student_id().await?;
        let college_course_id = parse_college_course_id(&draft.pending.college_course_id)?;
        Ok((student_id, college_course_id))
    }

    /// Confirm the selection and register
    ///
    /// Validation problems are shown on the confirmation step without
    /// calling the backend. A failed call returns there with a retryable
    /// notice and stores nothing.
    pub async fn submit(&mut self) -> IntakeResult<RegistrationRecord> {
        let draft = self.machine.draft()?;

        let (student_id, college_course_id) = match self.validate(&draft).await {
            Ok(ids) => ids,
            Err(e) => {
                if e.is_validation() {
                    self.machine.notify(Notice::Validation(e.to_string()))?;
                }
                return Err(e);
            }
        };

        let guard_id = format!("registration:{college_course_id}");
        let Some(_ticket) = self.guard.try_acquire(guard_id.clone()) else {
            return Err(IntakeError::AlreadyInFlight { id: guard_id });
        };

        let draft = self.machine.begin_submit()?;
        let request = RegistrationRequest {
            student_id,
            college_course_id,
            intake_session: draft.intake_session(),
            remarks: draft.remarks.clone(),
        };
        component_info!(
            ComponentId::current(),
            college_course_id = college_course_id,
            intake_session = %request.intake_session,
            "📝 Submitting registration"
        );

        match self.api.start_course_registration(&request).await {
            Ok(response) if response.success => {
                let record = RegistrationRecord {
                    registration_id: response
                        .response
                        .as_ref()
                        .and_then(RegistrationAck::id_string)
                        .unwrap_or_default(),
                    intake_session: request.intake_session,
                    remarks: request.remarks,
                };
                self.persist(&record).await;
                self.machine.complete(record.clone())?;

                component_info!(
                    ComponentId::current(),
                    registration_id = %record.registration_id,
                    "✅ Registration accepted"
                );
                Ok(record)
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Registration was not accepted".to_string());
                self.machine.fail(message.clone())?;
                component_warn!(ComponentId::current(), error = %message, "Registration rejected");
                Err(IntakeError::BackendError { status: None, message })
            }
            Err(e) => {
                self.machine.fail(e.to_string())?;
                component_warn!(ComponentId::current(), error = %e, "Registration call failed");
                Err(e)
            }
        }
    }

    /// The registration already exists remotely, so a store failure only warns
    async fn persist(&self, record: &RegistrationRecord) {
        let stored = match serde_json::to_value(record) {
            Ok(value) => self.store.set(SELECTED_INTAKE_KEY, value).await.map_err(IntakeError::from),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = stored {
            component_warn!(ComponentId::current(), error = %e, "Could not store selected intake");
        }
    }
}
