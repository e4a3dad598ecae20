//! Single-owner task wrapping one ChatSession.
//!
//! The UI keeps a `ChatHandle`; the session itself lives on a tokio task
//! that processes one turn at a time. Sends made while a turn is queued or
//! running are rejected, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kitchen_common::SessionId;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use super::manager::ChatSession;
use super::types::{ChatMessage, SessionError, SessionStatus};

/// Read-only copy of a session's transcript, republished after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptSnapshot {
    pub messages: Vec<ChatMessage>,
    pub status: SessionStatus,
    /// Index of the reply being streamed, if any.
    pub open_index: Option<usize>,
}

impl TranscriptSnapshot {
    pub fn of(session: &ChatSession) -> Self {
        Self {
            messages: session.transcript().messages().to_vec(),
            status: session.status(),
            open_index: session.transcript().open_index(),
        }
    }
}

/// Clears the `busy` flag on drop, so it is released even if the turn
/// panics or the task is aborted.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct ChatHandle {
    id: SessionId,
    tx: mpsc::UnboundedSender<String>,
    busy: Arc<AtomicBool>,
    snapshots: watch::Receiver<TranscriptSnapshot>,
}

impl ChatHandle {
    /// Move `session` onto its own task. Must be called within a tokio runtime.
    pub fn spawn(session: ChatSession) -> Self {
        let id = session.id().clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(TranscriptSnapshot::of(&session));
        let busy = Arc::new(AtomicBool::new(false));

        tokio::spawn(session_task(session, rx, Arc::clone(&busy), snapshot_tx));

        Self {
            id,
            tx,
            busy,
            snapshots,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Submit a user message. Returns once the turn is accepted; the reply
    /// arrives through `subscribe`/`snapshot`.
    pub fn send(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SessionError::InvalidInput("message is empty".into()));
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(SessionError::AlreadyInFlight);
        }
        if self.tx.send(text).is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    /// True from an accepted `send` until its turn settles.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TranscriptSnapshot> {
        self.snapshots.clone()
    }
}

async fn session_task(
    mut session: ChatSession,
    mut rx: mpsc::UnboundedReceiver<String>,
    busy: Arc<AtomicBool>,
    snapshots: watch::Sender<TranscriptSnapshot>,
) {
    while let Some(text) = rx.recv().await {
        let result = {
            let _guard = BusyGuard { flag: &busy };
            // The settled state is published after `busy` is released, so a
            // UI that reacts to it can send the next message right away.
            let publish = |s: &ChatSession| {
                if s.status().is_in_flight() {
                    snapshots.send_replace(TranscriptSnapshot::of(s));
                }
            };
            session.send_observed(&text, publish).await
        };
        snapshots.send_replace(TranscriptSnapshot::of(&session));

        if let Err(e) = result {
            warn!(session = %session.id(), error = %e, "Send rejected");
        }
    }
    debug!(session = %session.id(), "Chat session closed");
}
