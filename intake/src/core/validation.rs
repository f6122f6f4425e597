//! Input validation for the registration call

use crate::error::{IntakeError, IntakeResult};

/// Longest remark accepted, in characters
pub const MAX_REMARKS_CHARS: usize = 500;

/// Student id from a stored identifier such as "WC1042"
///
/// Non-digits are stripped; the rest must be a positive integer.
pub fn parse_student_id(raw: &str) -> IntakeResult<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(IntakeError::InvalidStudentId { value: raw.to_string() }),
    }
}

/// College course id; must already be a positive integer
pub fn parse_college_course_id(raw: &str) -> IntakeResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(IntakeError::InvalidCollegeCourseId { value: raw.to_string() }),
    }
}

/// Trimmed remarks capped at `MAX_REMARKS_CHARS`; blank becomes `None`
pub fn clamp_remarks(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_REMARKS_CHARS).collect())
}
