use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person using the widget.
    User,
    /// The chatbot.
    Bot,
}

/// A single turn of the transcript.
///
/// Messages are immutable once created. Bot messages may embed navigation
/// links written as `[title](url)`, which are resolved at render time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The message text.
    pub text: String,
    /// The author of this message.
    pub sender: Sender,
}

impl Message {
    /// Creates a message authored by the user.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    /// Creates a message authored by the bot.
    #[inline]
    pub fn bot<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }

    /// Returns `true` if this message is authored by the bot.
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// A suggested question offered to the user for the current page.
///
/// When `cached_answer` is present the widget answers locally without
/// asking the chat service. Otherwise selecting it is the same as typing
/// `label` as a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuickReply {
    /// The text shown on the button, also sent as the question.
    pub label: String,
    /// A precomputed answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_answer: Option<String>,
    /// An in-app path to visit after showing the cached answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl QuickReply {
    /// Creates a quick reply that is forwarded to the chat service.
    #[inline]
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
            cached_answer: None,
            link: None,
        }
    }

    /// Attaches a cached answer.
    #[inline]
    pub fn with_cached_answer<S: Into<String>>(mut self, answer: S) -> Self {
        self.cached_answer = Some(answer.into());
        self
    }

    /// Attaches a link to visit after the cached answer is shown.
    #[inline]
    pub fn with_link<S: Into<String>>(mut self, link: S) -> Self {
        self.link = Some(link.into());
        self
    }
}
