//! Search error types

use shared::SharedError;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Search error types
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search backend rejected request: {message}")]
    BackendError { status: Option<u16>, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Result cache error: {0}")]
    CacheError(#[from] SharedError),

    #[error("Invalid search query: {message}")]
    InvalidQuery { message: String },
}
