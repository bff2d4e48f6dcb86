use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, VeritasError};

/// Highest credibility score a record can carry.
pub const MAX_SCORE: u8 = 100;

// =============================================================================
// Enums
// =============================================================================

/// Coarse credibility band derived from a score, used for labelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 80 and above.
    HighlyCredible,
    /// 60 to 79.
    ModeratelyCredible,
    /// 40 to 59.
    LowCredibility,
    /// Below 40.
    HighlySuspicious,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreBand::HighlyCredible,
            60..=79 => ScoreBand::ModeratelyCredible,
            40..=59 => ScoreBand::LowCredibility,
            _ => ScoreBand::HighlySuspicious,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::HighlyCredible => "Highly Credible",
            ScoreBand::ModeratelyCredible => "Moderately Credible",
            ScoreBand::LowCredibility => "Low Credibility",
            ScoreBand::HighlySuspicious => "Highly Suspicious",
        }
    }
}

// =============================================================================
// AnalysisRecord
// =============================================================================

/// Immutable credibility verdict for a piece of text.
///
/// Fields are private so the invariants checked in [`AnalysisRecord::new`]
/// (score within `0..=100`, at least one explanation) hold for the lifetime
/// of the value. Records are shared between sessions behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    id: String,
    text: String,
    score: u8,
    explanations: Vec<String>,
    learn_more_url: String,
    created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Build a record, validating the score range and explanation list.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        score: u8,
        explanations: Vec<String>,
        learn_more_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if score > MAX_SCORE {
            return Err(VeritasError::InvalidRecord(format!(
                "score {} exceeds {}",
                score, MAX_SCORE
            )));
        }
        if explanations.is_empty() {
            return Err(VeritasError::InvalidRecord(
                "at least one explanation is required".to_string(),
            ));
        }

        Ok(Self {
            id: id.into(),
            text: text.into(),
            score,
            explanations,
            learn_more_url: learn_more_url.into(),
            created_at,
        })
    }

    /// Build a record from values known to satisfy the invariants.
    pub(crate) fn from_trusted_parts(
        id: String,
        text: String,
        score: u8,
        explanations: Vec<String>,
        learn_more_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(score <= MAX_SCORE);
        debug_assert!(!explanations.is_empty());
        Self {
            id,
            text,
            score,
            explanations,
            learn_more_url,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The analysed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Credibility score in `0..=100`.
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Ordered explanations; never empty.
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    /// The first explanation, treated as the primary finding.
    pub fn primary_explanation(&self) -> &str {
        // Non-empty by construction.
        self.explanations
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn learn_more_url(&self) -> &str {
        &self.learn_more_url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Credibility band for this record's score.
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    /// The first `max_chars` characters of the text, on a char boundary.
    pub fn text_preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
