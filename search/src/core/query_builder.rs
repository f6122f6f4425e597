//! Backend payload assembly

use shared::{FilterPayload, PagePayload, SearchPayload, SearchTerm};

use crate::core::normalizer::{
    map_duration_to_months, normalize_countries, normalize_intake_list, normalize_intake_str, normalize_levels,
    normalize_plain, sort_by_calendar,
};
use crate::types::SearchQuery;

/// Build the backend request body for a query snapshot
///
/// An `intake` URL parameter on the query wins over intakes selected in the
/// filter state, even when it normalizes to no constraint.
pub fn build_payload(query: &SearchQuery) -> SearchPayload {
    let filters = query.filters();

    let mut intake_months = match query.intake_param() {
        Some(param) => normalize_intake_str(param),
        None => normalize_intake_list(&filters.intakes),
    };
    sort_by_calendar(&mut intake_months);

    SearchPayload {
        pagination: PagePayload {
            page: query.page(),
            size: query.page_size(),
        },
        filters: FilterPayload {
            courses: normalize_plain(&filters.courses),
            departments: normalize_plain(&filters.departments),
            graduation_levels: normalize_levels(&filters.levels),
            countries: normalize_countries(&filters.countries),
            duration: map_duration_to_months(filters.duration),
            intake_months,
        },
        search: SearchTerm {
            term: query.free_text().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DurationMonths, FilterState, Vertical};

    fn query(filters: FilterState) -> SearchQuery {
        SearchQuery::new(Vertical::StudyAbroad, "data science", filters, 1, 12)
    }

    #[test]
    fn test_masters_usa_two_years() {
        let filters = FilterState::new()
            .with_level("masters")
            .with_country("usa")
            .with_duration(2, 2);

        let payload = build_payload(&query(filters));

        assert_eq!(payload.filters.graduation_levels, vec!["MASTER"]);
        assert_eq!(payload.filters.countries, vec!["United States of America"]);
        assert_eq!(
            payload.filters.duration,
            DurationMonths {
                min_months: 13,
                max_months: 24
            }
        );
        assert_eq!(payload.search.term, "data science");
        assert_eq!(payload.pagination, PagePayload { page: 1, size: 12 });
    }

    #[test]
    fn test_default_filters_are_unconstrained() {
        let payload = build_payload(&query(FilterState::new()));
        assert!(payload.filters.graduation_levels.is_empty());
        assert!(payload.filters.countries.is_empty());
        assert!(payload.filters.intake_months.is_empty());
        assert_eq!(payload.filters.duration, DurationMonths::default());
    }

    #[test]
    fn test_sentinels_never_reach_payload() {
        let filters = FilterState::new()
            .with_level("all")
            .with_country("all")
            .with_intake("all");
        let payload = build_payload(&query(filters));

        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("\"all\""));
        assert!(!json.contains("ALL"));
    }

    #[test]
    fn test_intake_param_overrides_filter_intakes() {
        let filters = FilterState::new().with_intake("jan");
        let payload = build_payload(&query(filters.clone()).with_intake_param(Some("fall")));
        assert_eq!(payload.filters.intake_months, vec!["SEP"]);

        let payload = build_payload(&query(filters));
        assert_eq!(payload.filters.intake_months, vec!["JAN"]);
    }

    #[test]
    fn test_intake_months_in_calendar_order() {
        let payload = build_payload(&query(FilterState::new()).with_intake_param(Some("sep, jan, may")));
        assert_eq!(payload.filters.intake_months, vec!["JAN", "MAY", "SEP"]);
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = build_payload(&query(FilterState::new().with_duration(2, 2)));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["pagination"]["size"], 12);
        assert_eq!(json["filters"]["duration"]["minMonths"], 13);
        assert_eq!(json["filters"]["duration"]["maxMonths"], 24);
        assert!(json["filters"]["intakeMonths"].is_array());
        assert!(json["filters"]["graduation_levels"].is_array());
        assert_eq!(json["search"]["term"], "data science");
    }

    #[test]
    fn test_identical_input_gives_identical_key() {
        let a = query(FilterState::new().with_country("uk").with_level("pg")).with_intake_param(Some("fall"));
        let b = query(FilterState::new().with_level("pg").with_country("uk")).with_intake_param(Some("fall"));
        assert_eq!(a.canonical_key().unwrap(), b.canonical_key().unwrap());
        assert_eq!(build_payload(&a), build_payload(&b));
    }

    #[test]
    fn test_any_differing_field_changes_key() {
        let base = query(FilterState::new().with_country("uk"));
        let base_key = base.canonical_key().unwrap();

        let variants = vec![
            SearchQuery::new(Vertical::StudyAbroad, "data science", FilterState::new().with_country("uk"), 2, 12),
            SearchQuery::new(Vertical::StudyAbroad, "data", FilterState::new().with_country("uk"), 1, 12),
            SearchQuery::new(Vertical::StudyAbroad, "data science", FilterState::new().with_country("us"), 1, 12),
            SearchQuery::new(
                Vertical::StudyAbroad,
                "data science",
                FilterState::new().with_country("uk").with_exam("IELTS"),
                1,
                12,
            ),
            SearchQuery::new(
                Vertical::StudyAbroad,
                "data science",
                FilterState::new().with_country("uk").with_fee_range(0, 5000),
                1,
                12,
            ),
            SearchQuery::new(
                Vertical::StudyAbroad,
                "data science",
                FilterState::new().with_country("uk").with_duration(2, 2),
                1,
                12,
            ),
            base.clone().with_intake_param(Some("jan")),
            SearchQuery::new(Vertical::StudyIndia, "data science", FilterState::new().with_country("uk"), 1, 12),
        ];

        for variant in variants {
            assert_ne!(variant.canonical_key().unwrap(), base_key, "{variant:?}");
        }
    }
}
