//! Conversation-related types.

use nyang_model::Message;

/// The ordered list of messages shown to the user, oldest first.
///
/// A transcript always starts with the greeting. It is only ever appended
/// to, or replaced wholesale by a fresh greeting when the session resets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub(crate) fn with_greeting(greeting: &str) -> Self {
        Self {
            messages: vec![Message::bot(greeting)],
        }
    }

    /// Returns all messages.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the last `min(size, len)` messages in transcript order.
    #[inline]
    pub fn trailing_window(&self, size: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(size);
        &self.messages[start..]
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub(crate) fn reset(&mut self, greeting: &str) {
        self.messages.clear();
        self.messages.push(Message::bot(greeting));
    }
}
