use std::fmt::Debug;
use std::time::Duration;

use url::Url;

/// The first message of every session.
pub const DEFAULT_GREETING: &str = "안녕하냥! 무엇을 도와줄까냥?";

/// Shown when the chat service answered without a reply.
pub const DEFAULT_NO_REPLY_TEXT: &str = "답변을 생성하지 못했다냥 😿";

/// Shown when the chat service could not be reached.
pub const DEFAULT_ERROR_TEXT: &str = "오류가 발생했다냥. 다시 말해달라냥!";

/// Shown by hosts while a chat request is in flight.
pub const PENDING_INDICATOR: &str = "...생각 중이다냥...";

/// Number of trailing messages sent as history (7 user/bot pairs).
pub const DEFAULT_HISTORY_WINDOW: usize = 14;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// How transient service failures are retried before falling back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    /// Delay before the first retry, doubled on every attempt.
    pub initial_interval: Duration,
    /// Total time after which the last error is reported.
    pub max_elapsed_time: Duration,
}

/// Builder for [`ChatbotConfig`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ChatbotConfigBuilder {
    greeting: Option<String>,
    no_reply_text: Option<String>,
    error_text: Option<String>,
    history_window: Option<usize>,
    origin: Option<Url>,
    retry_policy: Option<RetryPolicy>,
}

impl ChatbotConfigBuilder {
    /// Creates a builder with every option set to its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the greeting message.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Sets the text used when the service returns no reply.
    #[inline]
    pub fn with_no_reply_text<S: Into<String>>(mut self, text: S) -> Self {
        self.no_reply_text = Some(text.into());
        self
    }

    /// Sets the text used when the service fails.
    #[inline]
    pub fn with_error_text<S: Into<String>>(mut self, text: S) -> Self {
        self.error_text = Some(text.into());
        self
    }

    /// Sets how many trailing messages are sent as history.
    #[inline]
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = Some(window);
        self
    }

    /// Sets the origin of the page hosting the widget. Links to this origin
    /// are followed in-app.
    #[inline]
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Enables retrying transient failures.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ChatbotConfig {
        let origin = self.origin.unwrap_or_else(|| {
            Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL")
        });
        ChatbotConfig {
            greeting: self
                .greeting
                .unwrap_or_else(|| DEFAULT_GREETING.to_owned()),
            no_reply_text: self
                .no_reply_text
                .unwrap_or_else(|| DEFAULT_NO_REPLY_TEXT.to_owned()),
            error_text: self
                .error_text
                .unwrap_or_else(|| DEFAULT_ERROR_TEXT.to_owned()),
            history_window: self
                .history_window
                .unwrap_or(DEFAULT_HISTORY_WINDOW),
            origin,
            retry_policy: self.retry_policy,
        }
    }
}

impl Debug for ChatbotConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatbotConfigBuilder")
            .field("history_window", &self.history_window)
            .field("origin", &self.origin.as_ref().map(Url::as_str))
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

/// Configuration of a [`Chatbot`](crate::Chatbot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatbotConfig {
    pub(crate) greeting: String,
    pub(crate) no_reply_text: String,
    pub(crate) error_text: String,
    pub(crate) history_window: usize,
    pub(crate) origin: Url,
    pub(crate) retry_policy: Option<RetryPolicy>,
}

impl ChatbotConfig {
    /// Returns the greeting message.
    #[inline]
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Returns the history window size.
    #[inline]
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Returns the origin of the page hosting the widget.
    #[inline]
    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

impl Default for ChatbotConfig {
    #[inline]
    fn default() -> Self {
        ChatbotConfigBuilder::new().build()
    }
}
