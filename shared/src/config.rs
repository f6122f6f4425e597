//! Client configuration
//!
//! Values are loaded from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! Environment variables take precedence over .env file values, and command
//! line flags in the binaries take precedence over both.
//!
//! ## Recognized variables
//! - `COURSE_API_BASE_URL`: base URL of the course marketplace REST API
//! - `SEARCH_DEBOUNCE_MS`: debounce window for search input (default 350)
//! - `SEARCH_PAGE_SIZE`: results per page (default 12)
//! - `CLIENT_CACHE_DIR`: directory for the durable key-value store
//! - `CLIENT_REQUEST_TIMEOUT_MS`: HTTP request timeout (default 15000)
//! - `LOG_LEVEL`: base tracing level (default `info`)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{SharedError, SharedResult};

/// Runtime configuration shared by the search and intake components
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub debounce_ms: u64,
    pub page_size: u32,
    pub cache_dir: PathBuf,
    pub request_timeout_ms: u64,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            debounce_ms: 350,
            page_size: 12,
            cache_dir: PathBuf::from("./.course-cache"),
            request_timeout_ms: 15_000,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> SharedResult<Self> {
        // Silently ignored when no .env file exists
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("COURSE_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("SEARCH_DEBOUNCE_MS") {
            config.debounce_ms = parse_field("SEARCH_DEBOUNCE_MS", &value)?;
        }
        if let Some(value) = lookup("SEARCH_PAGE_SIZE") {
            let page_size: u32 = parse_field("SEARCH_PAGE_SIZE", &value)?;
            if page_size == 0 {
                return Err(SharedError::InvalidConfig {
                    field: "SEARCH_PAGE_SIZE".to_string(),
                    value,
                });
            }
            config.page_size = page_size;
        }
        if let Some(dir) = lookup("CLIENT_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("CLIENT_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = parse_field("CLIENT_REQUEST_TIMEOUT_MS", &value)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, value: &str) -> SharedResult<T> {
    value.trim().parse().map_err(|_| SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    })
}
