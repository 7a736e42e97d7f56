// tests/buffer_merge.rs
mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::*;
use global_signal_aggregator::analyze::velocity::FixedVelocity;
use global_signal_aggregator::analyze::SignalProcessor;
use global_signal_aggregator::buffer::{merge, title_fingerprint, SignalBuffer, BUFFER_CAP};
use global_signal_aggregator::{IntelligenceSignal, RawItem};

fn distinct(n: usize, prefix: &str) -> Vec<IntelligenceSignal> {
    (0..n)
        .map(|i| signal(&format!("{prefix}-{i}"), &format!("{prefix} story number {i}")))
        .collect()
}

fn assert_unique(signals: &[IntelligenceSignal]) {
    let ids: HashSet<_> = signals.iter().map(|s| s.id.clone()).collect();
    let fps: HashSet<_> = signals
        .iter()
        .map(|s| title_fingerprint(&s.translated_text))
        .collect();
    assert_eq!(ids.len(), signals.len(), "duplicate id survived");
    assert_eq!(fps.len(), signals.len(), "duplicate fingerprint survived");
}

#[test]
fn six_hundred_fresh_signals_are_capped_to_first_five_hundred() {
    let batch = distinct(600, "s");
    let expected: Vec<_> = batch[..BUFFER_CAP].iter().map(|s| s.id.clone()).collect();

    let out = merge(batch, &[]);
    assert_eq!(out.len(), BUFFER_CAP);
    let got: Vec<_> = out.iter().map(|s| s.id.clone()).collect();
    assert_eq!(got, expected);
}

#[test]
fn merge_never_exceeds_cap_for_any_sizes() {
    for (new_n, old_n) in [(0, 0), (1, 499), (250, 250), (400, 400), (1000, 0), (0, 900)] {
        let out = merge(distinct(new_n, "new"), &distinct(old_n, "old"));
        assert!(out.len() <= BUFFER_CAP);
        assert_eq!(out.len(), (new_n + old_n).min(BUFFER_CAP));
        assert_unique(&out);
    }
}

#[test]
fn empty_batch_is_a_noop_on_clean_buffer() {
    let existing = distinct(20, "old");
    let out = merge(Vec::new(), &existing);
    assert_eq!(out, existing);
}

#[test]
fn empty_batch_re_dedups_a_dirty_buffer() {
    let existing = vec![
        signal("A", "Flood warning issued"),
        signal("A", "Something else"),
        signal("B", "FLOOD warning issued!"),
        signal("C", "Unrelated"),
    ];
    let out = merge(Vec::new(), &existing);
    let ids: Vec<_> = out.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
    assert_unique(&out);
}

#[test]
fn new_entries_precede_existing_and_win_collisions() {
    let existing = vec![signal("A", "Old headline"), signal("B", "Kept headline")];
    let mut fresh = signal("A", "Updated headline");
    fresh.source = "Fresh Wire".into();

    let out = merge(vec![fresh, signal("N", "Brand new")], &existing);
    let ids: Vec<_> = out.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "N", "B"]);
    assert_eq!(out[0].source, "Fresh Wire");
}

#[test]
fn empty_buffer_plus_one_signal() {
    let buffer = SignalBuffer::new();
    assert!(buffer.latest().is_none());
    assert!(buffer.all().signals.is_empty());

    let s = signal("ONE", "Only story");
    buffer.merge_in(vec![s.clone()]);

    assert_eq!(buffer.all().signals, vec![s.clone()]);
    assert_eq!(buffer.latest(), Some(s));
}

#[test]
fn same_link_different_dates_share_id_and_collapse() {
    let raw = |day: u32, title: &str| RawItem {
        title: title.into(),
        link: "https://wire.test/same-story".into(),
        content: String::new(),
        published_at: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
        source: "Test Wire".into(),
        country: "Testland".into(),
        region: "Europe".into(),
        language: "English".into(),
    };
    let processor = SignalProcessor::new(Arc::new(FixedVelocity(0.3)));
    let a = processor.process(&raw(5, "Talks resume"));
    let b = processor.process(&raw(6, "Talks resume, day two"));
    assert_eq!(a.id, b.id);

    let out = merge(vec![b.clone(), a], &[]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0], b);
}

#[test]
fn readers_keep_their_snapshot_across_a_merge() {
    let buffer = SignalBuffer::new();
    buffer.merge_in(distinct(3, "first"));
    let held = buffer.all();

    buffer.merge_in(distinct(3, "second"));
    assert_eq!(held.signals.len(), 3, "held snapshot is immutable");
    assert_eq!(buffer.all().signals.len(), 6);
    assert_eq!(buffer.latest().unwrap().id, "second-0");
}

#[test]
fn concurrent_readers_see_whole_snapshots() {
    let buffer = Arc::new(SignalBuffer::new());
    let reader = {
        let buffer = buffer.clone();
        std::thread::spawn(move || {
            for _ in 0..2_000 {
                let n = buffer.all().signals.len();
                // Every merge below adds exactly 5; anything else is a torn read.
                assert_eq!(n % 5, 0, "observed partial merge: {n}");
            }
        })
    };
    for round in 0..50 {
        buffer.merge_in(distinct(5, &format!("r{round}")));
    }
    reader.join().unwrap();
    assert_eq!(buffer.len(), 250);
}
