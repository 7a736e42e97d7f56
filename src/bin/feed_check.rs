//! Connectivity check over the configured feed table.
//! Uses the same transport settings as the server; never touches the buffer.

use std::sync::Arc;

use global_signal_aggregator::config::ServiceConfig;
use global_signal_aggregator::ingest::config::load_feeds_default;
use global_signal_aggregator::ingest::http::HttpFeedClient;
use global_signal_aggregator::FeedFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = ServiceConfig::from_env();
    let feeds = load_feeds_default()?;
    let client = HttpFeedClient::new(cfg.fetch_timeout, &cfg.user_agent)?;
    let fetcher = FeedFetcher::new(Arc::new(client)).with_timeout(cfg.fetch_timeout);

    println!("Testing all {} feeds...\n", feeds.len());

    let (mut working, mut failed) = (0usize, 0usize);
    for feed in &feeds {
        match fetcher.fetch_feed(feed).await {
            Ok(items) if items.is_empty() => {
                // Reachable, just nothing to show.
                println!("[{}] {}... EMPTY (0 signals)", feed.country, feed.name);
                working += 1;
            }
            Ok(items) => {
                println!("[{}] {}... OK ({} signals)", feed.country, feed.name, items.len());
                working += 1;
            }
            Err(e) => {
                println!("[{}] {}... FAILED: {}", feed.country, feed.name, e);
                failed += 1;
            }
        }
    }

    println!("\nRESULTS: {working} working / {failed} failed");
    Ok(())
}
