//! Reply generation for questions about an analysis.
//!
//! [`LocalResponseGenerator`] composes templated replies from the analysis
//! record without any language model. It stands in for a remote service, so
//! each call first waits for a simulated network latency.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use veritas_core::config::ChatConfig;
use veritas_core::{AnalysisRecord, RandomSource};

use crate::error::ChatError;
use crate::intent::{classify, Intent};
use crate::types::Reply;

// =============================================================================
// Trait
// =============================================================================

/// Produces a reply to `message` in the context of an analysis record.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, message: &str, context: &AnalysisRecord)
        -> Result<Reply, ChatError>;
}

// =============================================================================
// LocalResponseGenerator
// =============================================================================

/// Heuristic, template-based generator. Never fails.
pub struct LocalResponseGenerator {
    random: Arc<dyn RandomSource>,
    latency_ms: RangeInclusive<u64>,
}

impl LocalResponseGenerator {
    /// Create a generator with the given simulated latency window.
    pub fn new(random: Arc<dyn RandomSource>, latency_ms: RangeInclusive<u64>) -> Self {
        Self { random, latency_ms }
    }

    /// Create a generator using the latency window from `config`.
    pub fn from_config(random: Arc<dyn RandomSource>, config: &ChatConfig) -> Self {
        Self::new(random, config.latency_min_ms..=config.latency_max_ms)
    }

    /// Compose a reply immediately, without the simulated latency.
    pub fn compose(&self, message: &str, context: &AnalysisRecord) -> Reply {
        let intent = classify(message);
        tracing::debug!(?intent, record_id = %context.id(), "Classified chat message");

        let text = match intent {
            Intent::ScoreExplain => score_explanation(context),
            Intent::WhyHow => format!(
                "Good question! {} This is one of the key indicators we look for when analyzing content for misinformation.",
                self.any_explanation(context)
            ),
            Intent::SourceVerify => format!(
                "When verifying news like this, always check: 1) The original source and its credibility, 2) Whether other reputable outlets are reporting the same story, 3) The publication date and context. For this specific content, {}.",
                context.primary_explanation().to_lowercase()
            ),
            Intent::MisinfoGeneral => format!(
                "Misinformation spreads faster than accurate information on social media. This content shows characteristics like {}. Always pause before sharing and verify through multiple credible sources.",
                context.primary_explanation().to_lowercase()
            ),
            Intent::SocialMedia => format!(
                "Social media platforms can amplify both accurate and false information. For content like this with a {}/100 score, it's important to verify before sharing. {}",
                context.score(),
                context.primary_explanation()
            ),
            Intent::Default => self.default_reply(context),
        };

        Reply {
            text,
            confidence: intent.confidence(),
        }
    }

    /// Draw the simulated latency for one call.
    pub fn draw_latency(&self) -> Duration {
        let ms = self
            .random
            .int_in_range(*self.latency_ms.start(), *self.latency_ms.end());
        Duration::from_millis(ms)
    }

    fn any_explanation<'a>(&self, context: &'a AnalysisRecord) -> &'a str {
        let explanations = context.explanations();
        &explanations[self.random.index(explanations.len())]
    }

    fn default_reply(&self, context: &AnalysisRecord) -> String {
        let template = self.random.index(DEFAULT_TEMPLATE_COUNT);
        let explanation = self.any_explanation(context);
        match template {
            0 => format!(
                "Based on the analysis, this content has several concerning elements. {}",
                explanation
            ),
            1 => format!(
                "That's an important question about media literacy. The key red flags in this content include {}.",
                explanation.to_lowercase()
            ),
            2 => format!(
                "From my analysis perspective, I'd note that {}. This is why critical evaluation is so important.",
                explanation.to_lowercase()
            ),
            _ => format!(
                "Good point! When I analyzed this content, I found that {}. This affects the overall credibility assessment.",
                explanation.to_lowercase()
            ),
        }
    }
}

#[async_trait]
impl ResponseGenerator for LocalResponseGenerator {
    async fn generate(
        &self,
        message: &str,
        context: &AnalysisRecord,
    ) -> Result<Reply, ChatError> {
        let latency = self.draw_latency();
        tokio::time::sleep(latency).await;
        Ok(self.compose(message, context))
    }
}

// =============================================================================
// Helpers
// =============================================================================

const DEFAULT_TEMPLATE_COUNT: usize = 4;

fn score_explanation(context: &AnalysisRecord) -> String {
    let factors = context
        .explanations()
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "The credibility score of {}/100 was determined based on several factors: {}. {}",
        context.score(),
        factors,
        credibility_phrase(context.score())
    )
}

fn credibility_phrase(score: u8) -> &'static str {
    if score >= 70 {
        "This indicates relatively high credibility."
    } else if score >= 40 {
        "This suggests moderate credibility concerns."
    } else {
        "This indicates significant credibility issues."
    }
}

// =============================================================================
// Tests
// =============================================================================
