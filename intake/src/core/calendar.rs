//! Intake calendar rules

use chrono::{Datelike, NaiveDate};

use shared::{month_number, PendingRegistration, MONTH_CODES};
use crate::types::IntakeOption;

/// Years offered after the current one
pub const YEARS_AHEAD: i32 = 2;

/// True iff the intake has already started
///
/// `month` is 1-based. The current month is still open.
pub fn is_past_intake(month: u32, year: i32, today: NaiveDate) -> bool {
    year < today.year() || (year == today.year() && month < today.month())
}

/// Years offered by the picker: the current year and the next two
pub fn year_options(today: NaiveDate) -> Vec<i32> {
    (today.year()..=today.year() + YEARS_AHEAD).collect()
}

/// Months a listing can be joined in, calendar ordered
///
/// Listings that do not advertise intakes accept all twelve months.
pub fn available_months(pending: &PendingRegistration) -> Vec<String> {
    let mut months: Vec<String> = pending
        .available_intake_months
        .iter()
        .map(|m| m.trim().to_uppercase())
        .filter(|m| month_number(m).is_some())
        .collect();
    months.sort_by_key(|m| month_number(m));
    months.dedup();

    if months.is_empty() {
        MONTH_CODES.iter().map(|m| m.to_string()).collect()
    } else {
        months
    }
}

/// Every offered (month, year) pair with its selectability
pub fn intake_grid(pending: &PendingRegistration, today: NaiveDate) -> Vec<IntakeOption> {
    let months = available_months(pending);
    year_options(today)
        .into_iter()
        .flat_map(|year| {
            months.iter().map(move |month| IntakeOption {
                month: month.clone(),
                year,
                selectable: month_number(month).is_some_and(|m| !is_past_intake(m, year, today)),
            })
        })
        .collect()
}
