//! Model backend seam used by chat sessions.
//!
//! A `ChatBackend` creates sessions bound to a fixed system instruction.
//! Each `BackendSession` keeps its own conversation history and streams
//! one reply per turn as ordered text chunks.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::session::ChatMessage;
use crate::AiError;

/// Ordered text fragments of one streamed reply. Ends normally or with an error.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, AiError>> + Send>>;

pub trait ChatBackend: Send + Sync {
    /// Open a session bound to `system_instruction`. The instruction is fixed
    /// for the life of the returned session.
    fn open_session(
        &self,
        system_instruction: &str,
        model: &str,
    ) -> Result<Box<dyn BackendSession>, AiError>;
}

#[async_trait]
pub trait BackendSession: Send {
    /// Send one user turn and stream the reply.
    ///
    /// After the stream ends normally, the user text and the full reply are
    /// part of the session history. A failed turn leaves the history as it was.
    async fn send_turn(&mut self, text: &str) -> Result<ChunkStream, AiError>;

    /// Turns the backend has recorded so far.
    fn history(&self) -> Vec<ChatMessage>;
}
