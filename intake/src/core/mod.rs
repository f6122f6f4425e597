//! Pure intake logic: calendar rules, input validation and the modal
//! state machine

pub mod calendar;
pub mod machine;
pub mod validation;

pub use calendar::{available_months, intake_grid, is_past_intake, year_options, YEARS_AHEAD};
pub use machine::IntakeMachine;
pub use validation::{clamp_remarks, parse_college_course_id, parse_student_id, MAX_REMARKS_CHARS};
