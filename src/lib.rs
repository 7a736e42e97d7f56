// src/lib.rs
// Public library surface for integration tests, the server and the feed checker.

pub mod analyze;
pub mod api;
pub mod buffer;
pub mod config;
pub mod ingest;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{IntelligenceSignal, SignalProcessor};
pub use crate::api::router;
pub use crate::buffer::{merge, SignalBuffer, BUFFER_CAP};
pub use crate::ingest::types::{FeedDescriptor, RawItem};
pub use crate::ingest::FeedFetcher;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::api::AppState;
use crate::config::ServiceConfig;
use crate::ingest::http::HttpFeedClient;
use crate::ingest::scheduler::{IngestPipeline, IngestScheduler, SchedulerHandle};
use crate::metrics::Metrics;

/// Wire the production pipeline: HTTP transport, OS-seeded velocity, shared buffer.
pub fn build_pipeline(
    cfg: &ServiceConfig,
    feeds: Vec<FeedDescriptor>,
    buffer: Arc<SignalBuffer>,
) -> anyhow::Result<IngestPipeline> {
    let client = HttpFeedClient::new(cfg.fetch_timeout, &cfg.user_agent)?;
    let fetcher = FeedFetcher::new(Arc::new(client))
        .with_timeout(cfg.fetch_timeout)
        .with_concurrency(cfg.fetch_concurrency);

    Ok(
        IngestPipeline::new(feeds, fetcher, SignalProcessor::default(), buffer)
            .with_max_items_per_cycle(cfg.max_items_per_cycle),
    )
}

/// Install the metrics recorder, start the poller and return the HTTP surface.
///
/// The recorder must exist before the first cycle runs, otherwise the metric
/// descriptions are spent on the no-op recorder and `/metrics` loses them.
pub fn start_service(pipeline: IngestPipeline, interval: Duration) -> (Router, SchedulerHandle) {
    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics disabled");
            None
        }
    };

    let buffer = Arc::clone(pipeline.buffer());
    let scheduler = IngestScheduler::new(Arc::new(pipeline))
        .with_interval(interval)
        .spawn();

    let mut router = api::create_router(AppState::new(buffer));
    if let Some(m) = metrics {
        router = router.merge(m.router());
    }
    (router, scheduler)
}
