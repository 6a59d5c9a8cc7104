//! Runtime configuration read from the environment
//!
//! Recognised variables:
//!   PROFILES_PATH, PRICE_SOURCE_URL, PRICE_TIMEOUT_SECS,
//!   LOOKBACK_DAYS, ON_FETCH_FAILURE (degrade|abort), PARALLEL_FETCH (0|1)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::market::{DEFAULT_CHART_URL, TRAILING_YEAR_DAYS};
use crate::recommend::{EnrichmentConfig, FetchFailurePolicy};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// CSV override for the built-in profile table
    pub profiles_path: Option<PathBuf>,

    pub price_source_url: String,

    pub request_timeout: Duration,

    pub enrichment: EnrichmentConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            profiles_path: None,
            price_source_url: DEFAULT_CHART_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let profiles_path = lookup("PROFILES_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let price_source_url = lookup("PRICE_SOURCE_URL").unwrap_or(defaults.price_source_url);

        let timeout_secs: u64 = lookup("PRICE_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let lookback_days: u32 = lookup("LOOKBACK_DAYS")
            .and_then(|s| s.parse().ok())
            .filter(|&d| d > 0)
            .unwrap_or(TRAILING_YEAR_DAYS);

        let on_failure = lookup("ON_FETCH_FAILURE")
            .and_then(|s| FetchFailurePolicy::parse(&s))
            .unwrap_or_default();

        let parallel = lookup("PARALLEL_FETCH")
            .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            profiles_path,
            price_source_url,
            request_timeout: Duration::from_secs(timeout_secs),
            enrichment: EnrichmentConfig {
                lookback_days,
                on_failure,
                parallel,
            },
        }
    }
}
