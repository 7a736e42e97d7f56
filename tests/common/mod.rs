// tests/common/mod.rs
// Scripted feed transport so integration tests never touch the network.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use global_signal_aggregator::analyze::{ImpactCategory, IntelligenceSignal};
use global_signal_aggregator::ingest::types::{FeedClient, FeedDescriptor, FeedError};

pub const BBC_XML: &str = include_str!("../fixtures/bbc_world.xml");
pub const FOLHA_XML: &str = include_str!("../fixtures/folha_mundo.xml");
pub const ATOM_XML: &str = include_str!("../fixtures/atom_wire.xml");
pub const MRSS_XML: &str = include_str!("../fixtures/mrss_wire.xml");

pub enum Reply {
    Body(&'static str),
    Fail,
    Hang,
    /// Sleeps, then serves the body.
    Slow(Duration, &'static str),
    /// Panics on the first call, serves the body afterwards.
    PanicOnce(&'static str),
}

pub struct ScriptedClient {
    replies: HashMap<String, Reply>,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    started_at: Mutex<Vec<tokio::time::Instant>>,
}

/// Decrements the in-flight count even when the request is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            started_at: Mutex::new(Vec::new()),
        }
    }

    /// Highest number of `get` calls that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Start time of every `get` call, in call order.
    pub fn started_at(&self) -> Vec<tokio::time::Instant> {
        self.started_at.lock().unwrap().clone()
    }

    pub fn with(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FeedClient for ScriptedClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.started_at.lock().unwrap().push(tokio::time::Instant::now());
        let now_running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now_running, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match self.replies.get(url) {
            Some(Reply::Body(b)) => Ok(b.as_bytes().to_vec()),
            Some(Reply::Fail) | None => Err(FeedError::Request(format!("no route to {url}"))),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            Some(Reply::Slow(delay, b)) => {
                tokio::time::sleep(*delay).await;
                Ok(b.as_bytes().to_vec())
            }
            Some(Reply::PanicOnce(b)) => {
                if n == 0 {
                    panic!("scripted transport blew up");
                }
                Ok(b.as_bytes().to_vec())
            }
        }
    }
}

pub fn feed(name: &str, url: &str, language: &str) -> FeedDescriptor {
    FeedDescriptor::new(name, url, "Testland", "Europe", language)
}

pub fn bbc() -> FeedDescriptor {
    feed("BBC News", "https://bbc.test/world.xml", "English")
}

pub fn folha() -> FeedDescriptor {
    feed("Folha de S.Paulo", "https://folha.test/mundo.xml", "Portuguese")
}

pub fn atom() -> FeedDescriptor {
    feed("Atom Wire", "https://wire.test/atom.xml", "English")
}

/// Client serving all three fixtures at their feed URLs.
pub fn fixture_client() -> ScriptedClient {
    ScriptedClient::new()
        .with(&bbc().url, Reply::Body(BBC_XML))
        .with(&folha().url, Reply::Body(FOLHA_XML))
        .with(&atom().url, Reply::Body(ATOM_XML))
}

/// Minimal hand-built signal for buffer tests.
pub fn signal(id: &str, title: &str) -> IntelligenceSignal {
    IntelligenceSignal {
        id: id.to_string(),
        source: "Test Wire".into(),
        source_url: format!("https://wire.test/{id}"),
        original_text: String::new(),
        translated_text: title.to_string(),
        language: "English".into(),
        country: "Testland".into(),
        region: "Europe".into(),
        topic: "General".into(),
        convergence_score: 0.0,
        velocity_score: 0.5,
        impact_score: 0.0,
        impact_category: ImpactCategory::General,
        is_breaking: false,
        confidence: 0.95,
        timestamp: Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap(),
    }
}
