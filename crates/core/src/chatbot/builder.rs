use std::sync::Arc;

use nyang_model::{ChatService, Message, QuickReply};

use super::{Chatbot, Hooks};
use crate::config::ChatbotConfig;
use crate::navigation::Navigator;
use crate::service_client::ServiceClient;

/// [`Chatbot`] builder.
pub struct ChatbotBuilder {
    pub(crate) service_client: ServiceClient,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) config: ChatbotConfig,
    pub(crate) initial_path: String,
    pub(crate) hooks: Hooks,
}

impl ChatbotBuilder {
    /// Creates a new builder with the specified chat service and the
    /// navigator of the host application.
    #[inline]
    pub fn with_service<S, N>(service: S, navigator: N) -> Self
    where
        S: ChatService + 'static,
        N: Navigator,
    {
        Self {
            service_client: ServiceClient::new(service),
            navigator: Arc::new(navigator),
            config: ChatbotConfig::default(),
            initial_path: "/".to_owned(),
            hooks: Hooks::default(),
        }
    }

    /// Sets the configuration.
    #[inline]
    pub fn with_config(mut self, config: ChatbotConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the page the widget is mounted on. Defaults to `/`.
    #[inline]
    pub fn with_initial_path<S: Into<String>>(mut self, path: S) -> Self {
        self.initial_path = path.into();
        self
    }

    /// Attaches a callback to be invoked when a message is appended to the
    /// transcript.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_message = Some(Box::new(on_message));
        self
    }

    /// Attaches a callback to be invoked when the quick replies change.
    #[inline]
    pub fn on_quick_replies(
        mut self,
        on_quick_replies: impl Fn(&[QuickReply]) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_quick_replies = Some(Box::new(on_quick_replies));
        self
    }

    /// Attaches a callback to be invoked when the session is reset.
    #[inline]
    pub fn on_reset(
        mut self,
        on_reset: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_reset = Some(Box::new(on_reset));
        self
    }

    /// Attaches a callback to be invoked when the widget has answered
    /// everything it was asked.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the widget and starts its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[inline]
    pub fn build(self) -> Chatbot {
        Chatbot::spawn_from_builder(self)
    }
}
