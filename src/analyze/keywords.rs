//! Fixed vocabularies for the impact and convergence heuristics.
//! Matching is plain substring search over lowercased text.

/// Each match adds 0.5 to the impact score.
pub const CRITICAL: &[&str] = &[
    "nuclear",
    "missile",
    "invasion",
    "declaration of war",
    "coup",
    "assassination",
    "cyber attack",
    "blackout",
];

/// Each match adds 0.3.
pub const HIGH: &[&str] = &[
    "sanctions",
    "embargo",
    "ultimatum",
    "deployment",
    "skirmish",
    "terrorism",
    "emergency",
];

/// Each match adds 0.1.
pub const MEDIUM: &[&str] = &[
    "summit",
    "treaty",
    "alliance",
    "agreement",
    "protest",
    "unrest",
    "diplomatic row",
];

/// Foreign-policy vocabulary behind the convergence score.
pub const POLICY: &[&str] = &[
    "diplomacy",
    "foreign policy",
    "geopolitical",
    "nato",
    "un",
    "asean",
    "brics",
];

// Tier weights in tenths, so sums and threshold checks stay exact.
pub const CRITICAL_TENTHS: u32 = 5;
pub const HIGH_TENTHS: u32 = 3;
pub const MEDIUM_TENTHS: u32 = 1;

/// Number of distinct vocabulary entries present in `text`.
pub fn count_matches(text: &str, vocab: &[&str]) -> u32 {
    vocab.iter().filter(|kw| text.contains(*kw)).count() as u32
}
