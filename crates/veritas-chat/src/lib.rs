//! Conversational assistant for a single credibility analysis.
//!
//! A [`ConversationSession`] keeps the message log about one analysis record
//! and hands each question to a [`ResponseGenerator`]: either the templated
//! [`LocalResponseGenerator`] or a [`RemoteResponseGenerator`] that falls
//! back to it.

pub mod error;
pub mod intent;
pub mod remote;
pub mod response;
pub mod session;
pub mod types;

pub use error::ChatError;
pub use intent::{classify, Intent, IntentRule, INTENT_RULES};
pub use remote::{GenerationContext, GenerationRequest, GenerationResponse, RemoteResponseGenerator};
pub use response::{LocalResponseGenerator, ResponseGenerator};
pub use session::{ConversationSession, PendingReply, APOLOGY_MESSAGE, SUGGESTED_QUESTIONS};
pub use types::{ChatMessage, Reply, Sender, SessionStatus};
