//! Signal processing: turns one `RawItem` into one scored, classified
//! `IntelligenceSignal`.
//!
//! Scoring is a fixed weighted-keyword heuristic:
//! - impact      : CRITICAL +0.5, HIGH +0.3, MEDIUM +0.1 per distinct keyword, capped at 1.0
//! - convergence : distinct policy keywords / 2, capped at 1.0
//! - category    : breaking (impact >= 0.7 or "breaking" in title) > alert (>= 0.3) > general

pub mod keywords;
pub mod velocity;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::ingest::types::RawItem;
use keywords::{CRITICAL, CRITICAL_TENTHS, HIGH, HIGH_TENTHS, MEDIUM, MEDIUM_TENTHS, POLICY};
use velocity::{ThreadRngVelocity, VelocitySource};

pub const ID_PREFIX: &str = "LOC-";
pub const TRANSLATION_MARKER: &str = "[TRANSLATED]";
pub const CONFIDENCE: f64 = 0.95;

pub const BREAKING_THRESHOLD: f64 = 0.7;
pub const ALERT_THRESHOLD: f64 = 0.3;
pub const FOREIGN_POLICY_THRESHOLD: f64 = 0.4;

pub const TOPIC_FOREIGN_POLICY: &str = "Foreign Policy";
pub const TOPIC_GENERAL: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactCategory {
    Breaking,
    Alert,
    General,
}

/// A processed, scored news record. Serialized with the camelCase keys the
/// dashboard consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceSignal {
    pub id: String,
    pub source: String,
    pub source_url: String,
    pub original_text: String,
    pub translated_text: String,
    pub language: String,
    pub country: String,
    pub region: String,
    pub topic: String,
    pub convergence_score: f64,
    pub velocity_score: f64,
    pub impact_score: f64,
    pub impact_category: ImpactCategory,
    pub is_breaking: bool,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

/// Stable identity for a link: `LOC-` + first 8 hex chars (upper) of SHA-256.
pub fn signal_id(link: &str) -> String {
    let d = Sha256::digest(link.as_bytes());
    format!("{ID_PREFIX}{:02X}{:02X}{:02X}{:02X}", d[0], d[1], d[2], d[3])
}

/// Impact score of already-lowercased text, in `[0, 1]`.
pub fn impact_score(text: &str) -> f64 {
    let tenths = keywords::count_matches(text, CRITICAL) * CRITICAL_TENTHS
        + keywords::count_matches(text, HIGH) * HIGH_TENTHS
        + keywords::count_matches(text, MEDIUM) * MEDIUM_TENTHS;
    f64::from(tenths.min(10)) / 10.0
}

/// Foreign-policy relevance of already-lowercased text, in `[0, 1]`.
pub fn convergence_score(text: &str) -> f64 {
    let hits = keywords::count_matches(text, POLICY);
    (f64::from(hits) / 2.0).min(1.0)
}

pub fn classify(impact: f64, title: &str) -> ImpactCategory {
    if impact >= BREAKING_THRESHOLD || title.to_lowercase().contains("breaking") {
        ImpactCategory::Breaking
    } else if impact >= ALERT_THRESHOLD {
        ImpactCategory::Alert
    } else {
        ImpactCategory::General
    }
}

pub struct SignalProcessor {
    velocity: Arc<dyn VelocitySource>,
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRngVelocity))
    }
}

impl SignalProcessor {
    pub fn new(velocity: Arc<dyn VelocitySource>) -> Self {
        Self { velocity }
    }

    /// Score and classify one item. Infallible: missing fields were defaulted upstream.
    pub fn process(&self, item: &RawItem) -> IntelligenceSignal {
        let text = format!("{} {}", item.title, item.content).to_lowercase();

        // No real translation; non-English titles are only marked.
        let translated_text = if item.language == "English" {
            item.title.clone()
        } else {
            format!("{TRANSLATION_MARKER} {}", item.title)
        };

        let impact = impact_score(&text);
        let convergence = convergence_score(&text);
        let category = classify(impact, &item.title);

        let topic = if convergence > FOREIGN_POLICY_THRESHOLD {
            TOPIC_FOREIGN_POLICY
        } else {
            TOPIC_GENERAL
        };

        IntelligenceSignal {
            id: signal_id(&item.link),
            source: item.source.clone(),
            source_url: item.link.clone(),
            original_text: item.content.clone(),
            translated_text,
            language: item.language.clone(),
            country: item.country.clone(),
            region: item.region.clone(),
            topic: topic.to_string(),
            convergence_score: convergence,
            velocity_score: self.velocity.sample(),
            impact_score: impact,
            impact_category: category,
            is_breaking: category == ImpactCategory::Breaking,
            confidence: CONFIDENCE,
            timestamp: item.published_at,
        }
    }

    pub fn process_all(&self, items: &[RawItem]) -> Vec<IntelligenceSignal> {
        items.iter().map(|it| self.process(it)).collect()
    }
}
