//! End-to-end tests: text in, analysis record out, conversation about it.
//!
//! Each test builds its own matcher and session with a seeded random source
//! and zero simulated latency.

use std::sync::Arc;

use veritas_chat::{
    ChatError, ConversationSession, LocalResponseGenerator, RemoteResponseGenerator, Sender,
    SessionStatus,
};
use veritas_core::config::{ChatConfig, RemoteConfig};
use veritas_core::{seed_records, AnalysisMatcher, ScoreBand, StdRandom, SystemClock};

// =============================================================================
// Helpers
// =============================================================================

fn fast_chat() -> ChatConfig {
    ChatConfig {
        latency_min_ms: 0,
        latency_max_ms: 0,
        ..ChatConfig::default()
    }
}

fn make_matcher(seed: u64) -> AnalysisMatcher {
    AnalysisMatcher::new(
        seed_records(),
        Arc::new(StdRandom::seeded(seed)),
        Arc::new(SystemClock),
    )
}

fn session_for(matcher: &AnalysisMatcher, text: &str) -> ConversationSession {
    let record = matcher.match_text(text);
    let generator = LocalResponseGenerator::from_config(Arc::new(StdRandom::seeded(11)), &fast_chat());
    ConversationSession::new(record, Arc::new(generator), Arc::new(SystemClock), fast_chat())
}

// =============================================================================
// Known records
// =============================================================================

#[tokio::test]
async fn test_known_claim_conversation() {
    let matcher = make_matcher(1);
    let session = session_for(&matcher, "breaking: government secretly");
    assert_eq!(session.record().id(), "1");
    assert_eq!(session.record().band(), ScoreBand::HighlySuspicious);

    session.open();
    assert!(session.messages()[0].content.contains("23/100"));

    let reply = session.ask("Why is the score so low?").await.unwrap();
    assert!(reply.content.contains("significant credibility issues"));

    let reply = session.ask("How can I verify sources?").await.unwrap();
    assert!(reply.content.starts_with("When verifying news like this"));

    let messages = session.messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[4].sender, Sender::Assistant);
}

#[tokio::test]
async fn test_high_scoring_record_reply() {
    let matcher = make_matcher(1);
    let session = session_for(&matcher, "Local weather forecast predicts rain");
    assert_eq!(session.record().score(), 92);

    session.open();
    let reply = session.ask("credibility?").await.unwrap();
    assert!(reply.content.contains("relatively high credibility"));
}

// =============================================================================
// Synthesized records
// =============================================================================

#[tokio::test]
async fn test_unknown_text_synthesizes_and_chats() {
    let matcher = make_matcher(7);
    let text = "Scientists confirm the moon is made of cheese";
    let session = session_for(&matcher, text);
    assert_eq!(session.record().text(), text);
    assert!(session.record().score() <= 100);
    assert_eq!(session.record().explanations().len(), 4);

    session.open();
    let reply = session.ask("Is this fake?").await.unwrap();
    assert!(reply.content.contains("pause before sharing"));
}

#[tokio::test]
async fn test_same_seed_same_synthetic_score() {
    let a = make_matcher(42).match_text("an unseen headline");
    let b = make_matcher(42).match_text("an unseen headline");
    assert_eq!(a.score(), b.score());
    assert_eq!(a.explanations(), b.explanations());
}

// =============================================================================
// Session rules
// =============================================================================

#[tokio::test]
async fn test_busy_then_ready() {
    let matcher = make_matcher(3);
    let session = session_for(&matcher, "Local weather");
    session.open();

    let pending = session.send_message("first").unwrap();
    assert!(matches!(
        session.send_message("second"),
        Err(ChatError::SessionBusy)
    ));
    pending.wait().await.unwrap();
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.message_count(), 3);
}

#[tokio::test]
async fn test_remote_disabled_endpoint_still_answers() {
    // Nothing listens on port 9; every request falls back locally.
    let config = RemoteConfig {
        enabled: true,
        endpoint: "http://127.0.0.1:9/api/llm/chat".to_string(),
        timeout_ms: 500,
    };
    let fallback = LocalResponseGenerator::from_config(Arc::new(StdRandom::seeded(2)), &fast_chat());
    let remote = RemoteResponseGenerator::new(&config, fallback).unwrap();

    let record = make_matcher(1).match_text("breaking: government");
    let session =
        ConversationSession::new(record, Arc::new(remote), Arc::new(SystemClock), fast_chat());
    session.open();

    let reply = session.ask("social media?").await.unwrap();
    assert!(reply.content.contains("23/100"));
    assert_eq!(session.status(), SessionStatus::Ready);
}
