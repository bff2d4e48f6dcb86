//! Resolves free text to an analysis record.
//!
//! Matching is a first-hit substring scan over the known records in their
//! declared order. Input that matches nothing gets a freshly synthesized
//! record with a random score.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::providers::{Clock, RandomSource};
use crate::types::{AnalysisRecord, MAX_SCORE};

/// Explanations attached to every synthesized record.
pub const SYNTHETIC_EXPLANATIONS: [&str; 4] = [
    "Content analyzed using AI detection algorithms",
    "Cross-referenced against known fact-checking databases",
    "Language pattern analysis completed",
    "Source credibility assessment performed",
];

struct KnownRecord {
    lowered: String,
    record: Arc<AnalysisRecord>,
}

/// Maps input text to a known or synthesized [`AnalysisRecord`].
pub struct AnalysisMatcher {
    known: Vec<KnownRecord>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    prefix_chars: usize,
    learn_more_url: String,
    sequence: AtomicU64,
}

impl AnalysisMatcher {
    /// Create a matcher over `known` with default analysis settings.
    pub fn new(
        known: Vec<AnalysisRecord>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(known, random, clock, &AnalysisConfig::default())
    }

    pub fn with_config(
        known: Vec<AnalysisRecord>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
        config: &AnalysisConfig,
    ) -> Self {
        let known = known
            .into_iter()
            .map(|record| KnownRecord {
                lowered: record.text().to_lowercase(),
                record: Arc::new(record),
            })
            .collect();

        Self {
            known,
            random,
            clock,
            prefix_chars: config.match_prefix_chars,
            learn_more_url: config.learn_more_url.clone(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Known records in matching order, e.g. for a history list.
    pub fn known_records(&self) -> impl Iterator<Item = &Arc<AnalysisRecord>> + '_ {
        self.known.iter().map(|k| &k.record)
    }

    /// Resolve `input` to a record. Never fails.
    ///
    /// Known-record hits return the shared record, so repeated calls are
    /// idempotent. Misses synthesize a new record each call.
    pub fn match_text(&self, input: &str) -> Arc<AnalysisRecord> {
        if let Some(record) = self.find_known(input) {
            tracing::debug!(record_id = %record.id(), "Matched known analysis record");
            return record;
        }

        let record = self.synthesize(input);
        tracing::info!(
            record_id = %record.id(),
            score = record.score(),
            "Synthesized analysis record for unmatched input"
        );
        Arc::new(record)
    }

    /// First known record whose lowercased text contains the input's
    /// lowercased prefix. An empty prefix matches nothing.
    pub fn find_known(&self, input: &str) -> Option<Arc<AnalysisRecord>> {
        let key = self.match_key(input);
        if key.is_empty() {
            return None;
        }
        self.known
            .iter()
            .find(|k| k.lowered.contains(&key))
            .map(|k| Arc::clone(&k.record))
    }

    fn match_key(&self, input: &str) -> String {
        input
            .to_lowercase()
            .chars()
            .take(self.prefix_chars)
            .collect()
    }

    fn synthesize(&self, input: &str) -> AnalysisRecord {
        let now = self.clock.now();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let score = self.random.int_in_range(0, u64::from(MAX_SCORE)) as u8;

        AnalysisRecord::from_trusted_parts(
            format!("{}-{}", now.timestamp_millis(), seq),
            input.to_string(),
            score,
            SYNTHETIC_EXPLANATIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            self.learn_more_url.clone(),
            now,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
