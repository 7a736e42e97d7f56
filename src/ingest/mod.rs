// src/ingest/mod.rs
pub mod config;
pub mod http;
pub mod parse;
pub mod registry;
pub mod scheduler;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::ingest::types::{FeedClient, FeedDescriptor, FeedError, FeedOutcome, FetchReport, RawItem};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_FETCH_CONCURRENCY: usize = 6;

const CONTENT_MAX_CHARS: usize = 1500;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_raw_items_total", "Raw items fetched across all feeds.");
        describe_counter!(
            "ingest_feed_errors_total",
            "Feed fetch/parse failures (per feed attempt)."
        );
        describe_counter!("ingest_cycles_total", "Completed ingest cycles.");
        describe_counter!(
            "ingest_cycle_panics_total",
            "Ingest cycles aborted by a panic and contained by the scheduler."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Signals dropped by id/title deduplication or the buffer cap."
        );
        describe_histogram!("ingest_fetch_ms", "Single feed fetch+parse time in milliseconds.");
        describe_gauge!("buffer_signals", "Signals currently held in the buffer.");
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix ts when the ingest pipeline last completed a cycle."
        );
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > CONTENT_MAX_CHARS {
        out = out.chars().take(CONTENT_MAX_CHARS).collect();
    }

    out
}

/// Pulls every feed of the table through a bounded pool, one failure never
/// affecting the others.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Arc<dyn FeedClient>,
    timeout: Duration,
    concurrency: usize,
}

impl FeedFetcher {
    pub fn new(client: Arc<dyn FeedClient>) -> Self {
        Self {
            client,
            timeout: DEFAULT_FETCH_TIMEOUT,
            concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and parse a single feed, bounded by the per-feed timeout.
    pub async fn fetch_feed(&self, feed: &FeedDescriptor) -> Result<Vec<RawItem>, FeedError> {
        let t0 = Instant::now();
        let body = match tokio::time::timeout(self.timeout, self.client.get(&feed.url)).await {
            Ok(res) => res?,
            Err(_) => return Err(FeedError::Timeout(self.timeout.as_secs())),
        };
        let items = parse::parse_feed(&body, feed, Utc::now())?;
        histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(items)
    }

    /// Fetch every feed and report per-feed outcomes alongside the items.
    pub async fn fetch_report(&self, feeds: &[FeedDescriptor]) -> FetchReport {
        ensure_metrics_described();

        // `buffered` keeps table order, so equal timestamps stay in feed order.
        let results: Vec<(FeedDescriptor, Result<Vec<RawItem>, FeedError>)> =
            stream::iter(feeds.iter().cloned())
                .map(|feed| async move {
                    let res = self.fetch_feed(&feed).await;
                    (feed, res)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut report = FetchReport::default();
        for (feed, res) in results {
            match res {
                Ok(items) => {
                    tracing::debug!(
                        target: "ingest",
                        feed = %feed.name,
                        items = items.len(),
                        "feed fetched"
                    );
                    report.outcomes.push(FeedOutcome::Fetched {
                        feed: feed.name,
                        items: items.len(),
                    });
                    report.items.extend(items);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "ingest",
                        feed = %feed.name,
                        url = %feed.url,
                        error = %e,
                        "feed fetch failed"
                    );
                    counter!("ingest_feed_errors_total").increment(1);
                    report.outcomes.push(FeedOutcome::Failed {
                        feed: feed.name,
                        reason: e,
                    });
                }
            }
        }

        report.items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        counter!("ingest_raw_items_total").increment(report.items.len() as u64);

        tracing::info!(
            target: "ingest",
            feeds_ok = report.feeds_ok(),
            feeds_failed = report.feeds_failed(),
            items = report.items.len(),
            "fetch pass finished"
        );
        report
    }

    /// All items from all reachable feeds, newest first. Never fails.
    pub async fn fetch_all(&self, feeds: &[FeedDescriptor]) -> Vec<RawItem> {
        self.fetch_report(feeds).await.items
    }
}
