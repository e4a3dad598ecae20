//! AI engine for AI Kitchen.
//!
//! Provides the Gemini client and the chat session core:
//! - Streaming (SSE) decoding into ordered text chunks
//! - Backend traits so sessions can run against Gemini or a scripted stand-in
//! - `ChatSession`: the per-subject transcript and turn state machine
//! - `ChatHandle`: a single-owner task wrapping one session
//! - Personas (Chef Gemini, Study Buddy) and single-shot generation

pub mod backend;
pub mod gemini;
pub mod generate;
pub mod persona;
pub mod recipe;
pub mod session;
pub mod streaming;

pub use backend::{BackendSession, ChatBackend, ChunkStream};
pub use gemini::{GeminiClient, GeminiConfig};
pub use generate::{GenerateRequest, InlineImage, TextGenerator};
pub use persona::Persona;
pub use recipe::{Recipe, RecipeIngredient};
pub use session::{
    ChatHandle, ChatMessage, ChatRole, ChatSession, FailurePolicy, SessionError, SessionStatus,
    Transcript, TranscriptSnapshot, TurnOutcome,
};

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}
