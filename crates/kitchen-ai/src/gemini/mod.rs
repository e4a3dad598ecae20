//! Google Gemini API client.
//!
//! Implements `ChatBackend` (streamed chat sessions) and `TextGenerator`
//! (single-shot generation) against the Generative Language API.

mod chat;
mod client;
mod config;
mod generate;

pub use chat::GeminiChat;
pub use client::GeminiClient;
pub use config::GeminiConfig;
