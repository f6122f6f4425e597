//! Core domain types shared by the search and intake components

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Three-letter month codes in calendar order
pub const MONTH_CODES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Calendar number (1-12) for a three-letter month code
pub fn month_number(code: &str) -> Option<u32> {
    let upper = code.trim().to_ascii_uppercase();
    MONTH_CODES
        .iter()
        .position(|&m| m == upper)
        .map(|idx| idx as u32 + 1)
}

/// Three-letter month code for a calendar number (1-12)
pub fn month_code(number: u32) -> Option<&'static str> {
    if (1..=12).contains(&number) {
        Some(MONTH_CODES[(number - 1) as usize])
    } else {
        None
    }
}

/// Top-level content category selecting data source and filter schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Vertical {
    #[default]
    StudyAbroad,
    StudyIndia,
    StudyOnline,
    Trainings,
    Jobs,
}

impl Vertical {
    /// Backend-driven verticals go through the fetch coordinator; the rest
    /// are served from a curated static dataset.
    pub fn is_backend_driven(&self) -> bool {
        matches!(self, Vertical::StudyAbroad | Vertical::StudyIndia)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Vertical::StudyAbroad => "study-abroad",
            Vertical::StudyIndia => "study-india",
            Vertical::StudyOnline => "study-online",
            Vertical::Trainings => "trainings",
            Vertical::Jobs => "jobs",
        }
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for Vertical {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "study-abroad" | "abroad" => Ok(Vertical::StudyAbroad),
            "study-india" | "india" => Ok(Vertical::StudyIndia),
            "study-online" | "online" => Ok(Vertical::StudyOnline),
            "trainings" | "training" => Ok(Vertical::Trainings),
            "jobs" | "job" => Ok(Vertical::Jobs),
            _ => Err(format!("Unknown vertical: {s}")),
        }
    }
}

/// Program duration filter in years; always `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct DurationRange {
    min_years: u32,
    max_years: u32,
}

impl DurationRange {
    /// Build a range, swapping the bounds if they arrive reversed
    pub fn new(min_years: u32, max_years: u32) -> Self {
        if min_years <= max_years {
            Self { min_years, max_years }
        } else {
            Self {
                min_years: max_years,
                max_years: min_years,
            }
        }
    }

    pub fn min_years(&self) -> u32 {
        self.min_years
    }

    pub fn max_years(&self) -> u32 {
        self.max_years
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self::new(1, 4)
    }
}

impl From<(u32, u32)> for DurationRange {
    fn from((min, max): (u32, u32)) -> Self {
        Self::new(min, max)
    }
}

impl From<DurationRange> for (u32, u32) {
    fn from(range: DurationRange) -> Self {
        (range.min_years, range.max_years)
    }
}

/// Tuition fee filter bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeRange {
    pub min: u64,
    pub max: u64,
}

impl FeeRange {
    pub const DEFAULT_MAX: u64 = 10_000_000;

    pub fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn contains(&self, fee: u64) -> bool {
        fee >= self.min && fee <= self.max
    }
}

impl Default for FeeRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// UI-domain filter selections for a search page session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub countries: BTreeSet<String>,
    pub levels: BTreeSet<String>,
    pub duration: DurationRange,
    pub exams: BTreeSet<String>,
    pub fee_range: FeeRange,
    pub courses: BTreeSet<String>,
    pub departments: BTreeSet<String>,
    pub intakes: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Clear all": every filter back to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.insert(country.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.levels.insert(level.into());
        self
    }

    pub fn with_duration(mut self, min_years: u32, max_years: u32) -> Self {
        self.duration = DurationRange::new(min_years, max_years);
        self
    }

    pub fn with_exam(mut self, exam: impl Into<String>) -> Self {
        self.exams.insert(exam.into());
        self
    }

    pub fn with_intake(mut self, intake: impl Into<String>) -> Self {
        self.intakes.insert(intake.into());
        self
    }

    pub fn with_fee_range(mut self, min: u64, max: u64) -> Self {
        self.fee_range = FeeRange::new(min, max);
        self
    }

    /// True when no filter narrows the result set
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

/// Which shape a listing was mapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    #[default]
    Backend,
    StaticDataset,
    CachedSnapshot,
}

/// Composite identity of a listing: institution + course
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingId {
    pub university_id: String,
    pub course_id: String,
}

impl ListingId {
    pub fn new(university_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            university_id: university_id.into(),
            course_id: course_id.into(),
        }
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.university_id, self.course_id)
    }
}

/// Normalized display entity for one course at one institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListing {
    pub id: ListingId,
    #[serde(default)]
    pub college_course_id: String,
    pub course_name: String,
    pub university_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub ranking: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub intake_months: Vec<String>,
    #[serde(default)]
    pub exams: Vec<String>,
    #[serde(default)]
    pub duration_months: Option<u32>,
    #[serde(default)]
    pub scholarship_available: bool,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub source: ListingSource,
}

impl CourseListing {
    /// Rankings at or above this value are placeholders, not real ranks
    pub const UNRANKED_THRESHOLD: u32 = 999;

    /// Ranking if it is a real one
    pub fn effective_ranking(&self) -> Option<u32> {
        self.ranking.filter(|&r| r > 0 && r < Self::UNRANKED_THRESHOLD)
    }

    pub fn fee_display(&self) -> String {
        if self.fee == 0 {
            "Contact for fees".to_string()
        } else {
            format_thousands(self.fee)
        }
    }

    pub fn ranking_display(&self) -> String {
        match self.effective_ranking() {
            Some(rank) => format!("#{rank}"),
            None => "N/A".to_string(),
        }
    }
}

/// Group digits in threes: 1234567 -> "1,234,567"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Pagination metadata attached to a result page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl PaginationMeta {
    /// Metadata for a list of `total_items` split into pages of `page_size`
    pub fn computed(current_page: u32, page_size: u32, total_items: u64) -> Self {
        let size = page_size.max(1) as u64;
        let total_pages = total_items.div_ceil(size).max(1) as u32;
        Self {
            current_page: current_page.clamp(1, total_pages),
            page_size: page_size.max(1),
            total_pages,
            total_items,
        }
    }
}

/// One page of results, replaced wholesale per fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<CourseListing>,
    pub pagination: PaginationMeta,
}

impl ResultPage {
    /// The explicit page shown after a failed fetch
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationMeta {
                current_page: 1,
                page_size: page_size.max(1),
                total_pages: 1,
                total_items: 0,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ephemeral apply-flow context, alive while the intake modal is open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRegistration {
    pub university_id: String,
    pub course_id: String,
    pub college_course_id: String,
    pub available_intake_months: Vec<String>,
    pub course_name: String,
    pub university_name: String,
}

impl PendingRegistration {
    pub fn from_listing(listing: &CourseListing) -> Self {
        Self {
            university_id: listing.id.university_id.clone(),
            course_id: listing.id.course_id.clone(),
            college_course_id: listing.college_course_id.clone(),
            available_intake_months: listing.intake_months.clone(),
            course_name: listing.course_name.clone(),
            university_name: listing.university_name.clone(),
        }
    }
}

/// Confirmation of a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub registration_id: String,
    pub intake_session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
