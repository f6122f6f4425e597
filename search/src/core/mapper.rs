//! Result source mapping
//!
//! Each result source has its own mapper, picked by the `ListingSource`
//! discriminator instead of sniffing which fields are present. Mapping is
//! per item: a malformed entry is dropped and logged, the rest of the batch
//! still renders.

use serde_json::Value;

use shared::logging::ComponentId;
use shared::{component_debug, CourseListing, ListingId, ListingSource};

use crate::core::normalizer::{normalize_intake_list, normalize_level, sort_by_calendar};

pub const UNKNOWN_COURSE: &str = "Unknown Course";
pub const UNKNOWN_UNIVERSITY: &str = "Unknown University";

/// Map a batch of raw items from one source
pub fn map_batch(source: ListingSource, items: &[Value]) -> Vec<CourseListing> {
    let mapped: Vec<CourseListing> = match source {
        ListingSource::Backend => items.iter().filter_map(map_backend_item).collect(),
        ListingSource::StaticDataset => items.iter().flat_map(map_static_university).collect(),
        ListingSource::CachedSnapshot => items.iter().filter_map(map_cached_item).collect(),
    };

    let dropped = items.len().saturating_sub(mapped.len());
    if source != ListingSource::StaticDataset && dropped > 0 {
        component_debug!(ComponentId::current(), source = ?source, dropped = dropped, "Dropped malformed result items");
    }
    mapped
}

/// First non-null field among `names`
fn field<'a>(item: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().filter_map(|name| item.get(*name)).find(|value| !value.is_null())
}

/// Field as trimmed text; numbers are rendered, blanks are absent
fn text(item: &Value, names: &[&str]) -> Option<String> {
    match field(item, names)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(item: &Value, names: &[&str]) -> Option<f64> {
    match field(item, names)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(item: &Value, names: &[&str]) -> bool {
    match field(item, names) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "available"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

fn string_list(item: &Value, names: &[&str]) -> Vec<String> {
    match field(item, names) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|value| value.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a fee given as a number or a currency-formatted string
///
/// Strings keep only their digits (anything after a decimal point is cents
/// and is ignored). Unparseable or negative fees are 0.
pub fn parse_fee(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite() && *v > 0.0).map(|v| v.round() as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let whole = s.split('.').next().unwrap_or_default();
            let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn fee(item: &Value, names: &[&str]) -> u64 {
    field(item, names).map(parse_fee).unwrap_or(0)
}

fn ranking(item: &Value, names: &[&str]) -> Option<u32> {
    number(item, names)
        .filter(|r| r.is_finite() && *r > 0.0)
        .map(|r| r.min(f64::from(u32::MAX)) as u32)
}

fn rating(item: &Value, names: &[&str]) -> Option<f32> {
    number(item, names).filter(|r| r.is_finite() && *r >= 0.0).map(|r| r as f32)
}

fn intake_months(item: &Value, names: &[&str]) -> Vec<String> {
    let mut months = match field(item, names) {
        Some(Value::Array(values)) => normalize_intake_list(values.iter().filter_map(Value::as_str)),
        Some(Value::String(s)) => normalize_intake_list(std::iter::once(s.as_str())),
        _ => Vec::new(),
    };
    sort_by_calendar(&mut months);
    months
}

fn location(city: Option<String>, country: &str) -> String {
    match city {
        Some(city) if !country.is_empty() => format!("{city}, {country}"),
        Some(city) => city,
        None => country.to_string(),
    }
}

/// Map one backend search result
///
/// An item needs at least a course identity; everything else has a default.
pub fn map_backend_item(item: &Value) -> Option<CourseListing> {
    if !item.is_object() {
        return None;
    }

    let college_course_id = text(item, &["collegeCourseId", "college_course_id", "id"]);
    let course_id = text(item, &["courseId", "course_id"]).or_else(|| college_course_id.clone())?;
    let university_id = text(item, &["collegeId", "college_id", "universityId", "university_id"]).unwrap_or_default();
    let country = text(item, &["country", "countryName"]).unwrap_or_default();

    Some(CourseListing {
        id: ListingId::new(university_id, course_id),
        college_course_id: college_course_id.unwrap_or_default(),
        course_name: text(item, &["courseName", "course_name", "name"]).unwrap_or_else(|| UNKNOWN_COURSE.to_string()),
        university_name: text(item, &["collegeName", "college_name", "universityName", "university_name"])
            .unwrap_or_else(|| UNKNOWN_UNIVERSITY.to_string()),
        location: location(text(item, &["city", "location"]), &country),
        country,
        level: text(item, &["graduationLevel", "graduation_level", "level"]).and_then(|l| normalize_level(&l)),
        fee: fee(item, &["fee", "tuitionFee", "tuition_fee", "fees"]),
        ranking: ranking(item, &["ranking", "rank"]),
        rating: rating(item, &["rating"]),
        intake_months: intake_months(item, &["intakeMonths", "intake_months", "intakes", "intake"]),
        exams: string_list(item, &["exams", "examsAccepted", "exams_accepted"]),
        duration_months: number(item, &["durationMonths", "duration_months", "duration"])
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d as u32),
        scholarship_available: flag(item, &["scholarshipAvailable", "scholarship_available", "scholarship"]),
        is_favorited: flag(item, &["isFavorited", "isWishlisted", "is_favorited"]),
        source: ListingSource::Backend,
    })
}

/// Flatten one curated university entry into one listing per course
///
/// University-level fields (name, location, ranking, rating, scholarship)
/// apply to every nested course; course entries without an id are dropped.
pub fn map_static_university(university: &Value) -> Vec<CourseListing> {
    let Some(courses) = university.get("courses").and_then(Value::as_array) else {
        component_debug!(ComponentId::current(), "Dropped static entry without a course list");
        return Vec::new();
    };

    let university_id = text(university, &["id", "universityId"]).unwrap_or_default();
    let university_name = text(university, &["name", "universityName"]).unwrap_or_else(|| UNKNOWN_UNIVERSITY.to_string());
    let country = text(university, &["country"]).unwrap_or_default();
    let location = location(text(university, &["city", "location"]), &country);
    let university_ranking = ranking(university, &["ranking", "rank"]);
    let university_rating = rating(university, &["rating"]);
    let scholarship = flag(university, &["scholarshipAvailable", "scholarship"]);

    courses
        .iter()
        .filter(|course| course.is_object())
        .filter_map(|course| {
            let course_id = text(course, &["id", "courseId"])?;
            Some(CourseListing {
                id: ListingId::new(university_id.clone(), course_id.clone()),
                college_course_id: text(course, &["collegeCourseId", "college_course_id"]).unwrap_or(course_id),
                course_name: text(course, &["name", "courseName"]).unwrap_or_else(|| UNKNOWN_COURSE.to_string()),
                university_name: university_name.clone(),
                location: location.clone(),
                country: country.clone(),
                level: text(course, &["level", "graduationLevel"]).and_then(|l| normalize_level(&l)),
                fee: fee(course, &["fee", "tuitionFee", "fees"]),
                ranking: university_ranking,
                rating: rating(course, &["rating"]).or(university_rating),
                intake_months: intake_months(course, &["intakes", "intakeMonths", "intake"]),
                exams: string_list(course, &["exams", "examsAccepted"]),
                duration_months: number(course, &["durationMonths", "duration"])
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .map(|d| d as u32),
                scholarship_available: scholarship || flag(course, &["scholarshipAvailable", "scholarship"]),
                is_favorited: false,
                source: ListingSource::StaticDataset,
            })
        })
        .collect()
}

/// Map one listing restored from the durable cache
pub fn map_cached_item(item: &Value) -> Option<CourseListing> {
    let mut listing: CourseListing = serde_json::from_value(item.clone()).ok()?;
    if listing.course_name.trim().is_empty() {
        listing.course_name = UNKNOWN_COURSE.to_string();
    }
    if listing.university_name.trim().is_empty() {
        listing.university_name = UNKNOWN_UNIVERSITY.to_string();
    }
    listing.source = ListingSource::CachedSnapshot;
    Some(listing)
}
