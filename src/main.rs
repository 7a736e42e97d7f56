//! Global signal aggregator binary entrypoint.
//! Starts the background ingest scheduler and serves the buffer over Axum.

use std::sync::Arc;

use global_signal_aggregator::buffer::SignalBuffer;
use global_signal_aggregator::config::ServiceConfig;
use global_signal_aggregator::ingest::config::load_feeds_default;
use global_signal_aggregator::{build_pipeline, start_service};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact console logs. `RUST_LOG` overrides the default filter; a no-op
/// when the runtime already installed a subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("global_signal_aggregator=info,ingest=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ServiceConfig::from_env();
    let feeds = load_feeds_default()?;
    tracing::info!(
        feeds = feeds.len(),
        interval_secs = cfg.poll_interval.as_secs(),
        "monitoring feeds for real-time intelligence"
    );

    let buffer = Arc::new(SignalBuffer::new());
    let pipeline = build_pipeline(&cfg, feeds, buffer)?;

    // Process-lifetime poller; the detached handle keeps it running.
    let (router, _scheduler) = start_service(pipeline, cfg.poll_interval);

    Ok(router.into())
}
