//! Chat assistant behavior.

use serde::{Deserialize, Serialize};

/// What happens to partially streamed text when a turn fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Replace the partial reply with the apology.
    #[default]
    Discard,
    /// Keep the partial reply and append the apology.
    KeepPartial,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssistantConfig {
    pub failure_policy: FailurePolicy,
}
