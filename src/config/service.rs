// src/config/service.rs
use std::time::Duration;

use crate::ingest::http::DEFAULT_USER_AGENT;
use crate::ingest::scheduler::{DEFAULT_MAX_ITEMS_PER_CYCLE, DEFAULT_POLL_INTERVAL};
use crate::ingest::{DEFAULT_FETCH_CONCURRENCY, DEFAULT_FETCH_TIMEOUT};

pub const ENV_POLL_INTERVAL_SECS: &str = "NEWS_POLL_INTERVAL_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "NEWS_FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_CONCURRENCY: &str = "NEWS_FETCH_CONCURRENCY";
pub const ENV_MAX_ITEMS_PER_CYCLE: &str = "NEWS_MAX_ITEMS_PER_CYCLE";
pub const ENV_USER_AGENT: &str = "NEWS_USER_AGENT";

/// Runtime knobs for the ingest service. Unset or invalid values fall back
/// to the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
    pub fetch_concurrency: usize,
    pub max_items_per_cycle: usize,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            max_items_per_cycle: DEFAULT_MAX_ITEMS_PER_CYCLE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            poll_interval: parse_positive_env(ENV_POLL_INTERVAL_SECS)
                .map(Duration::from_secs)
                .unwrap_or(d.poll_interval),
            fetch_timeout: parse_positive_env(ENV_FETCH_TIMEOUT_SECS)
                .map(Duration::from_secs)
                .unwrap_or(d.fetch_timeout),
            fetch_concurrency: parse_positive_env(ENV_FETCH_CONCURRENCY)
                .map(|v| v.min(32) as usize)
                .unwrap_or(d.fetch_concurrency),
            max_items_per_cycle: parse_positive_env(ENV_MAX_ITEMS_PER_CYCLE)
                .map(|v| v as usize)
                .unwrap_or(d.max_items_per_cycle),
            user_agent: std::env::var(ENV_USER_AGENT)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.user_agent),
        }
    }
}

// parse a positive integer env var; zero, negatives and junk are ignored
fn parse_positive_env(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
