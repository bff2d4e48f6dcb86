//! Keyword-based intent classification for chat messages.
//!
//! Precedence lives entirely in [`INTENT_RULES`]: rules are tried top to
//! bottom against the lowercased message and the first rule with any
//! matching keyword wins, even when a later rule would also match.
//!
//! Verification questions rank above generic "why"/"how" questions, so
//! "How can I verify sources?" is answered with verification advice.

use serde::{Deserialize, Serialize};

/// What a chat message is asking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Questions about the score itself.
    ScoreExplain,
    /// "Why" or "how" questions about the verdict.
    WhyHow,
    /// How to check sources or verify the claim.
    SourceVerify,
    /// Misinformation or fake news in general.
    MisinfoGeneral,
    /// Spread on social media.
    SocialMedia,
    /// Anything else.
    Default,
}

impl Intent {
    /// Confidence reported alongside replies of this intent.
    pub fn confidence(&self) -> f32 {
        match self {
            Intent::ScoreExplain => 0.90,
            Intent::WhyHow => 0.85,
            Intent::SourceVerify => 0.90,
            Intent::MisinfoGeneral => 0.88,
            Intent::SocialMedia => 0.82,
            Intent::Default => 0.75,
        }
    }
}

/// One entry in the classification chain.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    /// Lowercase substrings; any one of them selects this rule.
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Classification chain in precedence order. [`Intent::Default`] applies
/// when no rule matches.
pub const INTENT_RULES: [IntentRule; 5] = [
    IntentRule {
        intent: Intent::ScoreExplain,
        keywords: &["score", "credibility"],
    },
    IntentRule {
        intent: Intent::SourceVerify,
        keywords: &["source", "verify"],
    },
    IntentRule {
        intent: Intent::WhyHow,
        keywords: &["why", "how"],
    },
    IntentRule {
        intent: Intent::MisinfoGeneral,
        keywords: &["misinformation", "fake"],
    },
    IntentRule {
        intent: Intent::SocialMedia,
        keywords: &["social media"],
    },
];

/// Classify a message with the default rule chain.
pub fn classify(message: &str) -> Intent {
    classify_with(&INTENT_RULES, message)
}

/// Classify a message against an arbitrary ordered rule chain.
pub fn classify_with(rules: &[IntentRule], message: &str) -> Intent {
    let lowered = message.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Default)
}
