//! Search collaborator payloads

use serde::{Deserialize, Serialize};

/// Outgoing search request body
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchPayload {
    pub pagination: PagePayload,
    pub filters: FilterPayload,
    pub search: SearchTerm,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagePayload {
    pub page: u32,
    pub size: u32,
}

/// Backend-domain filters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct FilterPayload {
    pub courses: Vec<String>,
    pub departments: Vec<String>,
    pub graduation_levels: Vec<String>,
    pub countries: Vec<String>,
    pub duration: DurationMonths,
    #[serde(rename = "intakeMonths")]
    pub intake_months: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DurationMonths {
    pub min_months: u32,
    pub max_months: u32,
}

impl Default for DurationMonths {
    fn default() -> Self {
        Self {
            min_months: 0,
            max_months: 240,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SearchTerm {
    pub term: String,
}

/// Search response; items stay untyped until the mapper has checked them
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub pagination: Option<BackendPagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Pagination metadata as reported by the backend; any field may be absent
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackendPagination {
    #[serde(default, alias = "page")]
    pub current_page: Option<u32>,
    #[serde(default, alias = "size")]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "total")]
    pub total_items: Option<u64>,
}
