use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// Lifecycle state of a conversation session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Not displayed; sends are refused.
    #[default]
    Closed,
    /// Open and idle; accepts one message.
    Ready,
    /// A reply is being generated; further sends are refused as busy.
    AwaitingResponse,
}

// =============================================================================
// Structs
// =============================================================================

/// One entry in a session's append-only log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique within the owning session.
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
}

/// A generated reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    /// Classifier confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}
