// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the feed table. Immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
    pub country: String,
    pub region: String,
    pub language: String,
}

impl FeedDescriptor {
    pub fn new(name: &str, url: &str, country: &str, region: &str, language: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            country: country.to_string(),
            region: region.to_string(),
            language: language.to_string(),
        }
    }
}

/// Normalized feed entry, alive for a single fetch cycle only.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub country: String,
    pub region: String,
    pub language: String,
}

/// Why a single feed produced nothing this cycle.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("feed document has no item list")]
    MissingItems,
}

/// Result of one feed attempt inside a cycle.
#[derive(Debug)]
pub enum FeedOutcome {
    Fetched { feed: String, items: usize },
    Failed { feed: String, reason: FeedError },
}

impl FeedOutcome {
    pub fn feed(&self) -> &str {
        match self {
            FeedOutcome::Fetched { feed, .. } | FeedOutcome::Failed { feed, .. } => feed,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, FeedOutcome::Fetched { .. })
    }
}

/// Everything a fetch pass produced: the merged items plus one outcome per feed.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Sorted by `published_at`, newest first.
    pub items: Vec<RawItem>,
    pub outcomes: Vec<FeedOutcome>,
}

impl FetchReport {
    pub fn feeds_ok(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn feeds_failed(&self) -> usize {
        self.outcomes.len() - self.feeds_ok()
    }
}

/// Transport seam: returns the raw feed document body for a URL.
#[async_trait::async_trait]
pub trait FeedClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FeedError>;
}
