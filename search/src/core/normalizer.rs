//! UI-domain to backend-domain filter mapping
//!
//! Every table has an explicit fallback for unknown input: levels pass
//! through upper-cased, countries pass through unchanged and unknown month
//! tokens are dropped. Sentinels (`all`, `any`, blank) never reach the
//! backend as literal values.

use std::collections::HashSet;

use shared::{DurationMonths, DurationRange, MONTH_CODES};

/// Upper bound of every duration filter, in months
pub const MAX_DURATION_MONTHS: u32 = 240;

static LEVEL_SYNONYMS: &[(&str, &str)] = &[
    ("masters", "MASTER"),
    ("master", "MASTER"),
    ("pg", "MASTER"),
    ("postgraduate", "MASTER"),
    ("post graduate", "MASTER"),
    ("ug", "UNDERGRADUATE"),
    ("bachelor", "UNDERGRADUATE"),
    ("bachelors", "UNDERGRADUATE"),
    ("undergraduate", "UNDERGRADUATE"),
    ("phd", "PHD"),
    ("ph.d", "PHD"),
    ("doctorate", "PHD"),
    ("diploma", "DIPLOMA"),
];

static COUNTRY_SYNONYMS: &[(&str, &str)] = &[
    ("us", "United States of America"),
    ("usa", "United States of America"),
    ("u.s.a", "United States of America"),
    ("america", "United States of America"),
    ("united states", "United States of America"),
    ("uk", "United Kingdom"),
    ("gb", "United Kingdom"),
    ("england", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("uae", "United Arab Emirates"),
];

static SEASON_MONTHS: &[(&str, &str)] = &[
    ("fall", "SEP"),
    ("autumn", "SEP"),
    ("spring", "JAN"),
    ("winter", "JAN"),
    ("summer", "MAY"),
];

static MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(from, _)| *from == key).map(|(_, to)| *to)
}

/// Values that mean "no constraint"
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("any")
}

/// Map a study-level label to its backend enum value
pub fn normalize_level(input: &str) -> Option<String> {
    if is_sentinel(input) {
        return None;
    }
    let key = input.trim().to_lowercase();
    match lookup(LEVEL_SYNONYMS, &key) {
        Some(canonical) => Some(canonical.to_string()),
        None => Some(input.trim().to_uppercase()),
    }
}

/// Map a country label or abbreviation to its backend name
pub fn normalize_country(input: &str) -> Option<String> {
    if is_sentinel(input) {
        return None;
    }
    let key = input.trim().to_lowercase();
    match lookup(COUNTRY_SYNONYMS, &key) {
        Some(canonical) => Some(canonical.to_string()),
        None => Some(input.trim().to_string()),
    }
}

/// Normalize a set of levels into a sorted, de-duplicated list
pub fn normalize_levels<'a, I>(levels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    sorted_unique(levels.into_iter().filter_map(|level| normalize_level(level)))
}

/// Normalize a set of countries into a sorted, de-duplicated list
pub fn normalize_countries<'a, I>(countries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    sorted_unique(countries.into_iter().filter_map(|country| normalize_country(country)))
}

/// Trim free-form values and drop sentinels, sorted and de-duplicated
pub fn normalize_plain<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    sorted_unique(
        values
            .into_iter()
            .filter(|value| !is_sentinel(value))
            .map(|value| value.trim().to_string()),
    )
}

fn sorted_unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = values.collect();
    out.sort();
    out.dedup();
    out
}

/// Convert a duration filter in years to the backend month window
///
/// Equal bounds select a discrete bucket; a span maps each bound
/// separately, with 1 year meaning "from zero" and 4+ years meaning "no cap".
pub fn map_duration_to_months(duration: DurationRange) -> DurationMonths {
    let (min_years, max_years) = (duration.min_years(), duration.max_years());

    if min_years == max_years {
        let (min_months, max_months) = match min_years {
            0 | 1 => (0, 12),
            2 => (13, 24),
            3 => (25, 36),
            _ => (37, MAX_DURATION_MONTHS),
        };
        return DurationMonths { min_months, max_months };
    }

    let max_months = if max_years >= 4 {
        MAX_DURATION_MONTHS
    } else {
        max_years * 12
    };
    let min_months = if min_years <= 1 {
        0
    } else {
        min_years.saturating_mul(12).min(max_months)
    };

    DurationMonths { min_months, max_months }
}

/// Map one intake token to a month code
fn month_for_token(token: &str) -> Option<&'static str> {
    let token = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    if token.len() < 3 {
        return None;
    }
    if let Some(code) = lookup(SEASON_MONTHS, &token) {
        return Some(code);
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(token.as_str()))
        .map(|idx| MONTH_CODES[idx])
}

/// Normalize a free-form intake string into month codes
///
/// Tokens may be separated by commas, pipes or whitespace. Output keeps the
/// first-seen order and drops repeats and unknown tokens.
pub fn normalize_intake_str(input: &str) -> Vec<String> {
    normalize_intake_list(std::iter::once(input))
}

/// Normalize a list of intake strings into month codes
pub fn normalize_intake_list<I, S>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut months = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if is_sentinel(input) {
            continue;
        }
        for token in input.split(|c: char| c == ',' || c == '|' || c.is_whitespace()) {
            if token.is_empty() || is_sentinel(token) {
                continue;
            }
            if let Some(code) = month_for_token(token) {
                if seen.insert(code) {
                    months.push(code.to_string());
                }
            }
        }
    }

    months
}

/// Month codes in calendar order
pub fn sort_by_calendar(months: &mut [String]) {
    months.sort_by_key(|code| shared::month_number(code).unwrap_or(u32::MAX));
}
