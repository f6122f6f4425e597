//! Search core business logic

pub mod listing_filter;
pub mod mapper;
pub mod normalizer;
pub mod pagination;
pub mod query_builder;

pub use listing_filter::{apply_client_filters, sort_listings};
pub use mapper::{map_backend_item, map_batch, map_cached_item, map_static_university, parse_fee};
pub use normalizer::{
    map_duration_to_months, normalize_country, normalize_intake_list, normalize_intake_str, normalize_level,
};
pub use pagination::{client_slice, page_numbers, range_summary, server_pagination, PageControl};
pub use query_builder::build_payload;
