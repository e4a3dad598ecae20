//! Ordered message list with an index-addressed open reply.

use super::types::{ChatMessage, ChatRole, FailurePolicy};

/// The messages of one session in chronological order.
///
/// Index is identity: a streamed reply is a `Model` placeholder appended at
/// turn start and grown in place through `open`, never re-appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    open: Option<usize>,
}

impl Transcript {
    /// A transcript holding one model greeting.
    pub(crate) fn seeded(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::model(greeting)],
            open: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Index of the reply currently being streamed, if any.
    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    /// Append the user message and an empty reply placeholder. Returns the
    /// placeholder's index.
    pub(crate) fn open_turn(&mut self, user_text: impl Into<String>) -> usize {
        debug_assert!(self.open.is_none(), "turn opened while another is open");
        self.messages.push(ChatMessage::user(user_text));
        self.messages.push(ChatMessage::model(String::new()));
        let index = self.messages.len() - 1;
        self.open = Some(index);
        index
    }

    /// Append a chunk to the open reply. Returns false when no reply is open.
    pub(crate) fn append_to_open(&mut self, chunk: &str) -> bool {
        match self.open.and_then(|i| self.messages.get_mut(i)) {
            Some(message) => {
                message.text.push_str(chunk);
                true
            }
            None => false,
        }
    }

    /// Close the open reply, keeping its text.
    pub(crate) fn close_turn(&mut self) {
        self.open = None;
    }

    /// Close the open reply with an apology.
    pub(crate) fn fail_turn(&mut self, apology: &str, policy: FailurePolicy) {
        if let Some(message) = self.open.take().and_then(|i| self.messages.get_mut(i)) {
            debug_assert_eq!(message.role, ChatRole::Model);
            match policy {
                FailurePolicy::KeepPartial if !message.text.is_empty() => {
                    message.text.push_str("\n\n");
                    message.text.push_str(apology);
                }
                _ => message.text = apology.to_string(),
            }
        }
    }
}
