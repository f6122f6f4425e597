//! Shared logging utilities for consistent tracing across components

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use tracing::{error, info};

/// Global component ID - set once at startup
static COMPONENT_ID: OnceLock<ComponentId> = OnceLock::new();

/// Fallback for library use without a registered component
static UNREGISTERED: ComponentId = ComponentId::Library;

/// Identifies which part of the client emitted a trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    /// Search listing and fetch orchestration
    Search,
    /// Apply flow and registration
    Intake,
    /// Embedded use with no binary entry point
    Library,
}

impl ComponentId {
    pub fn init_search() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Search)
    }

    pub fn init_intake() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Intake)
    }

    /// The registered component, or `Library` when none was registered
    pub fn current() -> &'static ComponentId {
        COMPONENT_ID.get().unwrap_or(&UNREGISTERED)
    }

    fn default_filter(&self, base_level: &str) -> String {
        match self {
            ComponentId::Search => format!("search={base_level},shared={base_level},reqwest=warn,hyper=warn"),
            ComponentId::Intake => format!("intake={base_level},shared={base_level},reqwest=warn,hyper=warn"),
            ComponentId::Library => format!("{base_level},reqwest=warn,hyper=warn"),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Search => write!(f, "search"),
            ComponentId::Intake => write!(f, "intake"),
            ComponentId::Library => write!(f, "library"),
        }
    }
}

/// Initialize tracing subscriber with component-specific filtering
///
/// `RUST_LOG` wins over the computed default when it is set.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = log_level.unwrap_or("info");
    let default_filter = ComponentId::current().default_filter(base_level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    // try_init: a second initialization (e.g. from tests) is a no-op
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Initialize tracing subscriber at `info`
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for component-aware info logging
#[macro_export]
macro_rules! component_info {
    ($component:expr, $($arg:tt)*) => {
        tracing::info!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for component-aware warning logging
#[macro_export]
macro_rules! component_warn {
    ($component:expr, $($arg:tt)*) => {
        tracing::warn!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for component-aware error logging
#[macro_export]
macro_rules! component_error {
    ($component:expr, $($arg:tt)*) => {
        tracing::error!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for component-aware debug logging
#[macro_export]
macro_rules! component_debug {
    ($component:expr, $($arg:tt)*) => {
        tracing::debug!(
            component = %$component,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(component: &ComponentId, details: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(component: &ComponentId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        component = %component,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(component: &ComponentId, message: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
