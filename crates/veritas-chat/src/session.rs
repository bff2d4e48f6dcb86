//! Conversation session: the message log around one analysis record.
//!
//! A session moves between `Closed`, `Ready` and `AwaitingResponse`. Only a
//! `Ready` session accepts a message; the user message is appended at once
//! and the reply is generated on a spawned task that appends the assistant
//! message when it finishes. At most one generation is in flight per
//! session, and closing does not cancel it.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;
use veritas_core::config::ChatConfig;
use veritas_core::{AnalysisRecord, Clock};

use crate::error::ChatError;
use crate::response::ResponseGenerator;
use crate::types::{ChatMessage, Sender, SessionStatus};

/// Appended instead of a reply when generation fails outright.
pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Starter questions offered before the user has said anything.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Why did this content get such a low/high credibility score?",
    "What are the main red flags in this news?",
    "How can I verify this type of information?",
    "What makes this content suspicious?",
];

// =============================================================================
// Session state
// =============================================================================

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    messages: Vec<ChatMessage>,
    in_flight: bool,
    next_seq: u64,
}

impl SessionState {
    fn push(&mut self, id: String, sender: Sender, content: String, now: DateTime<Utc>) -> ChatMessage {
        // Keep timestamps non-decreasing even if the clock steps back.
        let sent_at = match self.messages.last() {
            Some(last) if last.sent_at > now => last.sent_at,
            _ => now,
        };
        let message = ChatMessage {
            id,
            content,
            sender,
            sent_at,
        };
        self.messages.push(message.clone());
        message
    }

    fn next_id(&mut self, sender: Sender) -> String {
        self.next_seq += 1;
        format!("{}-{}", sender.as_str(), self.next_seq)
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    // The state is only mutated through whole-message appends and status
    // assignments, so a poisoned guard is still consistent.
    state.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// ConversationSession
// =============================================================================

/// Ordered chat log about one [`AnalysisRecord`], with single-flight sends.
pub struct ConversationSession {
    id: Uuid,
    record: Arc<AnalysisRecord>,
    generator: Arc<dyn ResponseGenerator>,
    clock: Arc<dyn Clock>,
    config: ChatConfig,
    state: Arc<Mutex<SessionState>>,
}

impl ConversationSession {
    /// Create a closed, empty session.
    pub fn new(
        record: Arc<AnalysisRecord>,
        generator: Arc<dyn ResponseGenerator>,
        clock: Arc<dyn Clock>,
        config: ChatConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            generator,
            clock,
            config,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn record(&self) -> &Arc<AnalysisRecord> {
        &self.record
    }

    pub fn status(&self) -> SessionStatus {
        lock(&self.state).status
    }

    /// Snapshot of the message log in acceptance order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.state).messages.clone()
    }

    pub fn message_count(&self) -> usize {
        lock(&self.state).messages.len()
    }

    /// Starter questions, offered only while the log holds at most the
    /// welcome message.
    pub fn suggestions(&self) -> Vec<&'static str> {
        if lock(&self.state).messages.len() <= 1 {
            SUGGESTED_QUESTIONS.to_vec()
        } else {
            Vec::new()
        }
    }

    /// Open the session. Posts the welcome message on first open.
    ///
    /// No-op unless the session is `Closed`. Reopening while an earlier
    /// reply is still being generated resumes in `AwaitingResponse`.
    pub fn open(&self) {
        let mut state = lock(&self.state);
        if state.status != SessionStatus::Closed {
            return;
        }

        if state.messages.is_empty() {
            let content = self.welcome_text();
            state.push("welcome".to_string(), Sender::Assistant, content, self.clock.now());
        }

        state.status = if state.in_flight {
            SessionStatus::AwaitingResponse
        } else {
            SessionStatus::Ready
        };
        tracing::debug!(session_id = %self.id, status = ?state.status, "Session opened");
    }

    /// Close the session. Keeps the log and lets any pending reply land.
    pub fn close(&self) {
        let mut state = lock(&self.state);
        if state.status == SessionStatus::Closed {
            return;
        }
        state.status = SessionStatus::Closed;
        tracing::debug!(session_id = %self.id, in_flight = state.in_flight, "Session closed");
    }

    /// Accept a user message and start generating the reply.
    ///
    /// The user message is in the log when this returns. Fails with
    /// [`ChatError::SessionBusy`] while a reply is pending and with
    /// [`ChatError::SessionClosed`] before `open`; neither touches the log.
    /// Must be called within a tokio runtime.
    pub fn send_message(&self, text: &str) -> Result<PendingReply, ChatError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if content.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let user_message = {
            let mut state = lock(&self.state);
            match state.status {
                SessionStatus::Closed => return Err(ChatError::SessionClosed),
                SessionStatus::AwaitingResponse => {
                    tracing::debug!(session_id = %self.id, "Rejected message while awaiting reply");
                    return Err(ChatError::SessionBusy);
                }
                SessionStatus::Ready => {}
            }

            let id = state.next_id(Sender::User);
            let message = state.push(id, Sender::User, content.to_string(), self.clock.now());
            state.status = SessionStatus::AwaitingResponse;
            state.in_flight = true;
            message
        };

        tracing::debug!(session_id = %self.id, message_id = %user_message.id, "Accepted user message");

        let handle = tokio::spawn(complete_reply(
            self.id,
            content.to_string(),
            Arc::clone(&self.record),
            Arc::clone(&self.generator),
            Arc::clone(&self.clock),
            Arc::clone(&self.state),
        ));

        Ok(PendingReply {
            user_message,
            handle,
        })
    }

    /// Send a message and wait for the assistant reply.
    pub async fn ask(&self, text: &str) -> Result<ChatMessage, ChatError> {
        self.send_message(text)?.wait().await
    }

    fn welcome_text(&self) -> String {
        format!(
            "Hi! I'm an AI assistant ready to discuss this news analysis with you. The content \"{}...\" received a credibility score of {}/100. What would you like to know about this analysis or misinformation in general?",
            self.record.text_preview(self.config.welcome_preview_chars),
            self.record.score()
        )
    }
}

/// Generate the reply for one accepted message and append it to the log.
async fn complete_reply(
    session_id: Uuid,
    message: String,
    record: Arc<AnalysisRecord>,
    generator: Arc<dyn ResponseGenerator>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<SessionState>>,
) -> ChatMessage {
    // Run generation on its own task so a panicking generator still
    // releases the session.
    let generation =
        tokio::spawn(async move { generator.generate(&message, &record).await }).await;

    let content = match generation {
        Ok(Ok(reply)) => reply.text,
        Ok(Err(e)) => {
            tracing::warn!(session_id = %session_id, error = %e, "Reply generation failed");
            APOLOGY_MESSAGE.to_string()
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Reply generation task aborted");
            APOLOGY_MESSAGE.to_string()
        }
    };

    let mut state = lock(&state);
    let id = state.next_id(Sender::Assistant);
    let reply = state.push(id, Sender::Assistant, content, clock.now());
    state.in_flight = false;
    if state.status == SessionStatus::AwaitingResponse {
        state.status = SessionStatus::Ready;
    }
    tracing::debug!(session_id = %session_id, message_id = %reply.id, "Appended assistant reply");
    reply
}

// =============================================================================
// PendingReply
// =============================================================================

/// Handle to a reply that is being generated.
///
/// Dropping the handle does not cancel generation; the reply is appended
/// to the session either way.
#[derive(Debug)]
pub struct PendingReply {
    user_message: ChatMessage,
    handle: JoinHandle<ChatMessage>,
}

impl PendingReply {
    /// The user message that was appended when the send was accepted.
    pub fn user_message(&self) -> &ChatMessage {
        &self.user_message
    }

    /// Wait for the assistant message to be appended and return it.
    pub async fn wait(self) -> Result<ChatMessage, ChatError> {
        self.handle
            .await
            .map_err(|e| ChatError::Generation(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
