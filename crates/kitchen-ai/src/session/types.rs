//! Session value types and errors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    /// Role name on the Gemini wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    /// User message and placeholder appended; waiting for the stream to open.
    Awaiting,
    /// Chunks are being applied to the placeholder.
    Streaming,
    /// The last turn ended in error. Accepts the next send like `Idle`.
    Failed,
}

impl SessionStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionStatus::Awaiting | SessionStatus::Streaming)
    }
}

/// What happens to partially streamed text when a turn fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Replace the partial reply with the apology.
    #[default]
    Discard,
    /// Keep the partial reply and append the apology after a blank line.
    KeepPartial,
}

/// How a turn ended. Backend failures are absorbed into the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a reply is already in flight")]
    AlreadyInFlight,
    #[error("chat session is closed")]
    Closed,
}
