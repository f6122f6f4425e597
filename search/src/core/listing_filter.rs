//! In-memory filtering and sorting for statically sourced verticals
//!
//! Filters are compared in the backend domain: selections go through the
//! same normalizer the query builder uses, so "usa" matches a listing whose
//! country is "United States of America".

use std::cmp::Ordering;

use shared::{CourseListing, FilterState};

use crate::core::normalizer::{
    map_duration_to_months, normalize_countries, normalize_intake_list, normalize_levels, normalize_plain,
};
use crate::types::SortOrder;

/// Listings matching free text and filters, in `sort` order
pub fn apply_client_filters(
    listings: &[CourseListing],
    free_text: &str,
    filters: &FilterState,
    sort: SortOrder,
) -> Vec<CourseListing> {
    let matcher = ListingMatcher::new(free_text, filters);
    let mut matched: Vec<CourseListing> = listings.iter().filter(|l| matcher.matches(l)).cloned().collect();
    sort_listings(&mut matched, sort);
    matched
}

/// Pre-normalized filter selections
struct ListingMatcher {
    terms: Vec<String>,
    countries: Vec<String>,
    levels: Vec<String>,
    intakes: Vec<String>,
    exams: Vec<String>,
    duration_filter: Option<(u32, u32)>,
    fee_filter: Option<(u64, u64)>,
}

impl ListingMatcher {
    fn new(free_text: &str, filters: &FilterState) -> Self {
        let months = map_duration_to_months(filters.duration);
        let duration_filter = (filters.duration != Default::default()).then_some((months.min_months, months.max_months));
        let fee_filter = (!filters.fee_range.is_default()).then_some((filters.fee_range.min, filters.fee_range.max));

        Self {
            terms: free_text.split_whitespace().map(str::to_lowercase).collect(),
            countries: normalize_countries(&filters.countries)
                .into_iter()
                .map(|c| c.to_lowercase())
                .collect(),
            levels: normalize_levels(&filters.levels),
            intakes: normalize_intake_list(&filters.intakes),
            exams: normalize_plain(&filters.exams)
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            duration_filter,
            fee_filter,
        }
    }

    fn matches(&self, listing: &CourseListing) -> bool {
        self.matches_text(listing)
            && self.matches_country(listing)
            && self.matches_level(listing)
            && self.matches_intake(listing)
            && self.matches_exam(listing)
            && self.matches_duration(listing)
            && self.matches_fee(listing)
    }

    /// Every term must appear in the course name, institution or location
    fn matches_text(&self, listing: &CourseListing) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {}",
            listing.course_name, listing.university_name, listing.location
        )
        .to_lowercase();
        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }

    fn matches_country(&self, listing: &CourseListing) -> bool {
        self.countries.is_empty() || self.countries.contains(&listing.country.to_lowercase())
    }

    fn matches_level(&self, listing: &CourseListing) -> bool {
        self.levels.is_empty()
            || listing
                .level
                .as_ref()
                .is_some_and(|level| self.levels.contains(level))
    }

    fn matches_intake(&self, listing: &CourseListing) -> bool {
        self.intakes.is_empty() || listing.intake_months.iter().any(|m| self.intakes.contains(m))
    }

    fn matches_exam(&self, listing: &CourseListing) -> bool {
        self.exams.is_empty()
            || listing
                .exams
                .iter()
                .any(|exam| self.exams.contains(&exam.to_lowercase()))
    }

    /// Listings with unknown duration are kept
    fn matches_duration(&self, listing: &CourseListing) -> bool {
        match (self.duration_filter, listing.duration_months) {
            (Some((min, max)), Some(months)) => months >= min && months <= max,
            _ => true,
        }
    }

    /// Fee 0 means "contact for fees" and only passes a range starting at 0
    fn matches_fee(&self, listing: &CourseListing) -> bool {
        match self.fee_filter {
            Some((min, max)) => listing.fee >= min && listing.fee <= max,
            None => true,
        }
    }
}

/// Sort listings in place; unknown values sort last, ties keep input order
pub fn sort_listings(listings: &mut [CourseListing], sort: SortOrder) {
    match sort {
        SortOrder::Relevance => {}
        SortOrder::FeeLowToHigh => listings.sort_by(|a, b| known_first(nonzero(a.fee), nonzero(b.fee), |x, y| x.cmp(&y))),
        SortOrder::FeeHighToLow => listings.sort_by(|a, b| known_first(nonzero(a.fee), nonzero(b.fee), |x, y| y.cmp(&x))),
        SortOrder::RankingBest => {
            listings.sort_by(|a, b| known_first(a.effective_ranking(), b.effective_ranking(), |x, y| x.cmp(&y)))
        }
        SortOrder::RatingBest => listings.sort_by(|a, b| {
            known_first(a.rating, b.rating, |x, y| y.partial_cmp(&x).unwrap_or(Ordering::Equal))
        }),
    }
}

fn nonzero(fee: u64) -> Option<u64> {
    (fee > 0).then_some(fee)
}

fn known_first<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
