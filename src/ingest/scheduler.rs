// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::analyze::SignalProcessor;
use crate::buffer::SignalBuffer;
use crate::ingest::types::FeedDescriptor;
use crate::ingest::FeedFetcher;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_ITEMS_PER_CYCLE: usize = 300;

/// What one fetch -> process -> merge cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub raw_items: usize,
    pub processed: usize,
    /// False when the cycle had nothing to merge.
    pub merged: bool,
    pub buffer_len: usize,
}

/// Everything a cycle needs, shareable with the background task.
pub struct IngestPipeline {
    feeds: Arc<[FeedDescriptor]>,
    fetcher: FeedFetcher,
    processor: SignalProcessor,
    buffer: Arc<SignalBuffer>,
    max_items_per_cycle: usize,
}

impl IngestPipeline {
    pub fn new(
        feeds: Vec<FeedDescriptor>,
        fetcher: FeedFetcher,
        processor: SignalProcessor,
        buffer: Arc<SignalBuffer>,
    ) -> Self {
        Self {
            feeds: feeds.into(),
            fetcher,
            processor,
            buffer,
            max_items_per_cycle: DEFAULT_MAX_ITEMS_PER_CYCLE,
        }
    }

    pub fn with_max_items_per_cycle(mut self, n: usize) -> Self {
        self.max_items_per_cycle = n;
        self
    }

    pub fn buffer(&self) -> &Arc<SignalBuffer> {
        &self.buffer
    }

    pub fn feeds(&self) -> &[FeedDescriptor] {
        &self.feeds
    }

    /// One full cycle. Feed failures are absorbed by the fetcher; an empty
    /// fetch leaves the buffer untouched.
    pub async fn run_cycle(&self) -> CycleReport {
        tracing::info!(target: "ingest", feeds = self.feeds.len(), "ingest cycle started");

        let fetched = self.fetcher.fetch_report(&self.feeds).await;
        let mut report = CycleReport {
            feeds_ok: fetched.feeds_ok(),
            feeds_failed: fetched.feeds_failed(),
            raw_items: fetched.items.len(),
            ..CycleReport::default()
        };

        if fetched.items.is_empty() {
            tracing::warn!(
                target: "ingest",
                feeds_failed = report.feeds_failed,
                "no raw items fetched; buffer left unchanged"
            );
            report.buffer_len = self.buffer.len();
            return report;
        }

        let take = fetched.items.len().min(self.max_items_per_cycle);
        let signals = self.processor.process_all(&fetched.items[..take]);
        report.processed = signals.len();

        let stats = self.buffer.merge_in(signals);
        report.merged = true;
        report.buffer_len = stats.after;

        counter!("ingest_dedup_total").increment(stats.dropped as u64);
        gauge!("buffer_signals").set(stats.after as f64);
        tracing::info!(
            target: "ingest",
            raw = report.raw_items,
            processed = report.processed,
            dropped = stats.dropped,
            buffer = stats.after,
            "buffer updated"
        );
        report
    }
}

/// Periodic driver: one cycle right away, then one cycle `interval` after the
/// previous one *completed*. Cycles never overlap.
pub struct IngestScheduler {
    pipeline: Arc<IngestPipeline>,
    interval: Duration,
}

/// Running scheduler. Dropping the handle detaches the loop, which then runs
/// for the rest of the process lifetime.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Ask the loop to exit and wait for it. An in-flight cycle is allowed to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            tracing::warn!(target: "ingest", error = %e, "scheduler task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl IngestScheduler {
    pub fn new(pipeline: Arc<IngestPipeline>) -> Self {
        Self {
            pipeline,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the loop on the current Tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (tx, mut rx) = watch::channel(false);
        let IngestScheduler { pipeline, interval } = self;

        let join = tokio::spawn(async move {
            loop {
                // Each cycle runs in its own task so a panic is contained
                // here and the next cycle is still scheduled.
                let p = Arc::clone(&pipeline);
                match tokio::spawn(async move { p.run_cycle().await }).await {
                    Ok(report) => {
                        counter!("ingest_cycles_total").increment(1);
                        gauge!("ingest_pipeline_last_run_ts")
                            .set(chrono::Utc::now().timestamp() as f64);
                        tracing::info!(
                            target: "ingest",
                            feeds_ok = report.feeds_ok,
                            feeds_failed = report.feeds_failed,
                            merged = report.merged,
                            buffer = report.buffer_len,
                            "ingest cycle finished"
                        );
                    }
                    Err(e) => {
                        counter!("ingest_cycle_panics_total").increment(1);
                        tracing::error!(
                            target: "ingest",
                            error = %e,
                            "ingest cycle aborted; next cycle still scheduled"
                        );
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = shutdown_requested(&mut rx) => break,
                }
            }
            tracing::info!(target: "ingest", "ingest scheduler stopped");
        });

        SchedulerHandle { shutdown: tx, join }
    }
}

/// Resolves once `stop` was called. Never resolves after the handle is dropped.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
