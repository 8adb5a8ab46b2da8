//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, `.env` /
//! process environment, CLI flags.

use std::path::PathBuf;

/// Path to a JSON schedule table replacing the built-in one.
pub const ENV_SCHEDULES: &str = "LEAKAGE_SCHEDULES";
/// `tracing` filter directive, e.g. `info` or `leakage_calc=debug`.
pub const ENV_LOG: &str = "LEAKAGE_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub schedules_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schedules_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment (loading `.env` first if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();
        if let Some(path) = non_empty(ENV_SCHEDULES) {
            config.schedules_path = Some(PathBuf::from(path));
        }
        if let Some(filter) = non_empty(ENV_LOG) {
            config.log_filter = filter;
        }
        config
    }

    /// Apply CLI overrides on top of the environment.
    pub fn with_overrides(mut self, schedules: Option<PathBuf>, log_filter: Option<String>) -> Self {
        if schedules.is_some() {
            self.schedules_path = schedules;
        }
        if let Some(filter) = log_filter {
            self.log_filter = filter;
        }
        self
    }
}
