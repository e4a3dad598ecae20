//! Chat session management.
//!
//! A `ChatSession` owns one conversation bound to a fixed persona: the
//! backend session, the transcript shown to the user, and the turn state
//! machine that streams each reply into a placeholder message in place.
//!
//! ```text
//! Idle --send--> Awaiting --stream opened--> Streaming --chunk*--> Streaming
//! Streaming --stream ends ok--> Idle
//! Awaiting|Streaming --error--> Failed --send (same as Idle)--> Awaiting
//! ```

mod handle;
mod manager;
mod transcript;
mod turn;
mod types;


pub use handle::{ChatHandle, TranscriptSnapshot};
pub use manager::ChatSession;
pub use transcript::Transcript;
pub use types::{ChatMessage, ChatRole, FailurePolicy, SessionError, SessionStatus, TurnOutcome};
