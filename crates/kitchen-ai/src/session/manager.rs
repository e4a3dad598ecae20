//! ChatSession struct, creation, and turn state transitions.

use std::sync::Arc;

use kitchen_common::SessionId;
use tracing::{info, warn};

use crate::backend::{BackendSession, ChatBackend};
use crate::persona::Persona;
use crate::AiError;

use super::transcript::Transcript;
use super::types::{FailurePolicy, SessionError, SessionStatus};

/// One conversation bound to one persona.
pub struct ChatSession {
    pub(super) id: SessionId,
    pub(super) persona: Persona,
    pub(super) model: String,
    pub(super) backend: Arc<dyn ChatBackend>,
    /// Bound backend conversation. `None` until opened successfully.
    pub(super) bound: Option<Box<dyn BackendSession>>,
    pub(super) transcript: Transcript,
    pub(super) status: SessionStatus,
    pub(super) policy: FailurePolicy,
}

impl ChatSession {
    /// Open a session for `persona` and seed the transcript with its greeting.
    ///
    /// If the backend cannot open a session now, creation still succeeds;
    /// the next `send` retries and reports a failure as a failed turn.
    pub fn create(
        backend: Arc<dyn ChatBackend>,
        persona: Persona,
        model: impl Into<String>,
    ) -> Result<Self, SessionError> {
        if persona.system_instruction().trim().is_empty() {
            return Err(SessionError::InvalidInput(
                "system context must not be empty".into(),
            ));
        }

        let model = model.into();
        let id = SessionId::new();
        let bound = match backend.open_session(persona.system_instruction(), &model) {
            Ok(bound) => Some(bound),
            Err(e) => {
                warn!(session = %id, error = %e, "Backend session unavailable, will retry on send");
                None
            }
        };

        info!(session = %id, subject = persona.subject(), model = %model, "Chat session created");

        Ok(Self {
            id,
            transcript: Transcript::seeded(persona.greeting()),
            persona,
            model,
            backend,
            bound,
            status: SessionStatus::Idle,
            policy: FailurePolicy::default(),
        })
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Return the bound backend session, opening it if an earlier open failed.
    pub(super) fn bound_session(&mut self) -> Result<&mut Box<dyn BackendSession>, AiError> {
        let bound = match self.bound.take() {
            Some(bound) => bound,
            None => self
                .backend
                .open_session(self.persona.system_instruction(), &self.model)?,
        };
        Ok(self.bound.insert(bound))
    }

    /// Validate a send and move to `Awaiting`, appending the user message
    /// and the reply placeholder.
    pub(super) fn begin_turn(&mut self, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::InvalidInput("message is empty".into()));
        }
        if self.status.is_in_flight() {
            return Err(SessionError::AlreadyInFlight);
        }
        self.status = SessionStatus::Awaiting;
        self.transcript.open_turn(text);
        Ok(())
    }

    pub(super) fn mark_streaming(&mut self) {
        debug_assert_eq!(self.status, SessionStatus::Awaiting);
        self.status = SessionStatus::Streaming;
    }

    pub(super) fn apply_chunk(&mut self, chunk: &str) {
        if self.status == SessionStatus::Streaming {
            self.transcript.append_to_open(chunk);
        }
    }

    pub(super) fn complete_turn(&mut self) {
        self.transcript.close_turn();
        self.status = SessionStatus::Idle;
    }

    /// Settle the open reply as failed. Diagnostic detail stays in the log.
    pub(super) fn fail_turn(&mut self, reason: &str) {
        warn!(session = %self.id, reason, "Chat turn failed");
        self.transcript.fail_turn(self.persona.apology(), self.policy);
        self.status = SessionStatus::Failed;
    }
}
