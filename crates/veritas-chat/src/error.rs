//! Error types for the conversation engine.

use veritas_core::VeritasError;

/// Errors from reply generation and session handling.
///
/// Generation errors (`Transport`, `Api`, `Protocol`, `Generation`) never
/// reach a session's caller: the remote generator falls back to local
/// replies and the session turns anything left into an apology message.
/// Validation and session-state errors are returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session is closed")]
    SessionClosed,
    #[error("session is busy waiting for a reply")]
    SessionBusy,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("generation error: {0}")]
    Generation(String),
    #[error("core error: {0}")]
    Core(#[from] VeritasError),
}

impl ChatError {
    /// Whether the caller can simply try the same operation again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChatError::SessionBusy | ChatError::Transport(_) | ChatError::Api { .. }
        )
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Protocol(err.to_string())
        } else if err.is_timeout() {
            ChatError::Transport(format!("request timed out: {}", err))
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Protocol(err.to_string())
    }
}
