//! Async turn processing for ChatSession (send + streaming).

use std::ops::{Deref, DerefMut};

use futures_util::StreamExt;
use kitchen_common::new_correlation_id;
use tracing::debug;

use crate::AiError;

use super::manager::ChatSession;
use super::types::{SessionError, TurnOutcome};

/// Settles the turn as failed if the turn future is dropped mid-stream, so
/// the session never stays stuck in `Awaiting` or `Streaming`.
struct TurnGuard<'a> {
    session: &'a mut ChatSession,
    settled: bool,
}

impl Deref for TurnGuard<'_> {
    type Target = ChatSession;

    fn deref(&self) -> &ChatSession {
        self.session
    }
}

impl DerefMut for TurnGuard<'_> {
    fn deref_mut(&mut self) -> &mut ChatSession {
        self.session
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.settled && self.session.status.is_in_flight() {
            self.session.fail_turn("turn dropped before completion");
        }
    }
}

impl ChatSession {
    /// Send a user message and stream the reply into the transcript.
    pub async fn send(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        self.send_observed(text, |_| {}).await
    }

    /// Like `send`, calling `observer` after every transcript mutation: once
    /// when the turn opens, once when the stream opens, once per chunk, and
    /// once when the turn settles.
    ///
    /// Returns `Err` only for rejected sends, which leave the transcript
    /// untouched. Backend failures are absorbed into the transcript and
    /// reported as `TurnOutcome::Failed`.
    pub async fn send_observed<F>(
        &mut self,
        text: &str,
        mut observer: F,
    ) -> Result<TurnOutcome, SessionError>
    where
        F: FnMut(&ChatSession),
    {
        self.begin_turn(text)?;

        let turn_id = new_correlation_id();
        debug!(session = %self.id, turn = %turn_id, "Chat turn started");

        let mut turn = TurnGuard {
            session: self,
            settled: false,
        };
        observer(&*turn);

        let outcome = match turn.stream_reply(text, &mut observer).await {
            Ok(chunks) => {
                debug!(session = %turn.id, turn = %turn_id, chunks, "Chat turn completed");
                turn.complete_turn();
                TurnOutcome::Completed
            }
            Err(e) => {
                turn.fail_turn(&e.to_string());
                TurnOutcome::Failed
            }
        };
        turn.settled = true;
        observer(&*turn);
        Ok(outcome)
    }

    /// Open the backend stream and apply each chunk in arrival order.
    /// Returns the number of chunks applied.
    async fn stream_reply<F>(&mut self, text: &str, observer: &mut F) -> Result<usize, AiError>
    where
        F: FnMut(&ChatSession),
    {
        let mut stream = self.bound_session()?.send_turn(text).await?;
        self.mark_streaming();
        observer(&*self);

        let mut chunks = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            self.apply_chunk(&chunk);
            chunks += 1;
            observer(&*self);
        }
        Ok(chunks)
    }
}
