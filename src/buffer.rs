//! # Signal Buffer
//! Freshest-first, deduplicated, size-capped collection of signals.
//!
//! Readers always get a whole immutable snapshot (`Arc<BufferSnapshot>`);
//! a merge builds the next snapshot off to the side and swaps the pointer,
//! so nobody ever observes a half-merged buffer.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};

use crate::analyze::IntelligenceSignal;

/// Maximum number of signals retained at once.
pub const BUFFER_CAP: usize = 500;

const FINGERPRINT_LEN: usize = 100;

/// Lowercase, keep `[a-z0-9]` only, first 100 chars.
pub fn title_fingerprint(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(FINGERPRINT_LEN)
        .collect()
}

/// Merge `new_batch` in front of `existing`, dropping any entry whose id or
/// title fingerprint was already seen earlier in the walk, then cap at 500.
pub fn merge(
    new_batch: Vec<IntelligenceSignal>,
    existing: &[IntelligenceSignal],
) -> Vec<IntelligenceSignal> {
    merge_with_cap(new_batch, existing, BUFFER_CAP)
}

pub fn merge_with_cap(
    new_batch: Vec<IntelligenceSignal>,
    existing: &[IntelligenceSignal],
    cap: usize,
) -> Vec<IntelligenceSignal> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(cap.min(new_batch.len() + existing.len()));

    let combined = new_batch.into_iter().chain(existing.iter().cloned());
    for signal in combined {
        if out.len() == cap {
            break;
        }
        let fp = title_fingerprint(&signal.translated_text);
        if seen_ids.contains(&signal.id) || seen_titles.contains(&fp) {
            continue;
        }
        seen_ids.insert(signal.id.clone());
        seen_titles.insert(fp);
        out.push(signal);
    }
    out
}

/// Immutable view of the buffer at one point in time.
#[derive(Debug, Default)]
pub struct BufferSnapshot {
    pub signals: Vec<IntelligenceSignal>,
    /// `None` until the first merge commits.
    pub updated_at: Option<DateTime<Utc>>,
}

impl BufferSnapshot {
    pub fn latest(&self) -> Option<&IntelligenceSignal> {
        self.signals.first()
    }

    pub fn is_populated(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// Outcome of one committed merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub incoming: usize,
    pub before: usize,
    pub after: usize,
    /// Entries dropped as duplicates or by the cap.
    pub dropped: usize,
}

/// The single piece of mutable shared state. The scheduler is the only
/// writer; any number of readers may take snapshots concurrently.
#[derive(Debug)]
pub struct SignalBuffer {
    current: RwLock<Arc<BufferSnapshot>>,
    // Serializes writers; the RwLock is held only for the pointer swap.
    writer: Mutex<()>,
    cap: usize,
}

impl Default for SignalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBuffer {
    pub fn new() -> Self {
        Self::with_cap(BUFFER_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            current: RwLock::new(Arc::new(BufferSnapshot::default())),
            writer: Mutex::new(()),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Current snapshot (signals + last update time).
    pub fn snapshot(&self) -> Arc<BufferSnapshot> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&*guard)
    }

    /// Full buffer, freshest first. The returned snapshot is shared and immutable.
    pub fn all(&self) -> Arc<BufferSnapshot> {
        self.snapshot()
    }

    /// First entry of the buffer, if any.
    pub fn latest(&self) -> Option<IntelligenceSignal> {
        self.snapshot().latest().cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge a freshly processed batch and atomically publish the result.
    pub fn merge_in(&self, new_batch: Vec<IntelligenceSignal>) -> MergeStats {
        let _writer = self.writer.lock().unwrap_or_else(|p| p.into_inner());

        let prev = self.snapshot();
        let incoming = new_batch.len();
        let merged = merge_with_cap(new_batch, &prev.signals, self.cap);
        let stats = MergeStats {
            incoming,
            before: prev.signals.len(),
            after: merged.len(),
            dropped: incoming + prev.signals.len() - merged.len(),
        };

        let next = Arc::new(BufferSnapshot {
            signals: merged,
            updated_at: Some(Utc::now()),
        });
        let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
        *guard = next;
        stats
    }
}
