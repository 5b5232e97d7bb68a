mod builder;
mod state;

use std::collections::VecDeque;
use std::sync::Arc;

use nyang_actor::{Actor, ActorDeadError};
use nyang_model::{Message, QuickReply};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::config::ChatbotConfig;
use crate::conversation::Transcript;
use crate::link::LinkResolver;
use crate::navigation::{NavigationEvent, Navigator};
use crate::service_client::ServiceClient;
use crate::session::{Generation, RequestToken, Session};
pub use builder::ChatbotBuilder;
use state::*;

#[derive(Default)]
pub(crate) struct Hooks {
    pub on_message: Option<Box<dyn Fn(&Message) + Send + Sync>>,
    pub on_quick_replies: Option<Box<dyn Fn(&[QuickReply]) + Send + Sync>>,
    pub on_reset: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

struct ChatbotState {
    service_client: ServiceClient,
    navigator: Arc<dyn Navigator>,
    link_resolver: LinkResolver,
    config: Arc<ChatbotConfig>,
    session: Session,
    transcript: Transcript,
    draft_input: String,
    in_flight: Option<RequestToken>,
    pending_inputs: VecDeque<String>,
    quick_replies: Vec<QuickReply>,
    suggestions_token: Option<RequestToken>,
    is_open: bool,
    current_path: String,
    hooks: Hooks,
}

/// A point-in-time copy of the widget state, for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatbotSnapshot {
    /// Messages shown to the user, oldest first.
    pub transcript: Vec<Message>,
    /// Whether a chat request is in flight.
    pub pending: bool,
    /// Messages waiting for the in-flight request to finish.
    pub queued_inputs: usize,
    /// The content of the input field.
    pub draft_input: String,
    /// Quick replies for the current page.
    pub quick_replies: Vec<QuickReply>,
    /// Whether the chat window is open.
    pub is_open: bool,
    /// The path of the current page, without the query string.
    pub current_path: String,
    /// The current session.
    pub generation: Generation,
}

/// The chatbot widget.
///
/// The widget owns the transcript, the quick replies and the state of the
/// input field, and runs on its own task. Every method just posts a message
/// to that task and returns immediately, so calls made from one place are
/// handled in order. Use [`Chatbot::snapshot`] or the hooks on
/// [`ChatbotBuilder`] to observe the results.
///
/// Answers that arrive after the session was reset are dropped. At most one
/// chat request is in flight, later messages wait in a queue and are sent
/// once the current one is answered.
///
/// The widget stops when every clone of this handle is dropped.
#[derive(Clone)]
pub struct Chatbot {
    handle: Actor<ChatbotState>,
}

impl Chatbot {
    /// Sends a message typed by the user. Blank messages are ignored.
    #[inline]
    pub fn send_user_message<S: Into<String>>(&self, text: S) {
        self.post(SendUserMessage(text.into()));
    }

    /// Replaces the content of the input field.
    #[inline]
    pub fn set_draft<S: Into<String>>(&self, text: S) {
        self.post(SetDraft(text.into()));
    }

    /// Sends the content of the input field and clears it.
    #[inline]
    pub fn submit_draft(&self) {
        self.post(SubmitDraft);
    }

    /// Handles a click on a quick reply.
    #[inline]
    pub fn select_quick_reply(&self, reply: QuickReply) {
        self.post(SelectQuickReply(reply));
    }

    /// Handles a click on the quick reply at `index` of the current set.
    #[inline]
    pub fn select_quick_reply_at(&self, index: usize) {
        self.post(SelectQuickReplyAt(index));
    }

    /// Fetches quick replies for the current page.
    #[inline]
    pub fn refresh_quick_replies(&self) {
        self.post(RefreshQuickReplies);
    }

    /// Follows a link found in a reply.
    #[inline]
    pub fn follow_link<S: Into<String>>(&self, target_url: S) {
        self.post(FollowLink(target_url.into()));
    }

    /// Reports a navigation in the host application.
    #[inline]
    pub fn navigated(&self, event: NavigationEvent) {
        self.post(Navigated(event));
    }

    /// Opens the chat window.
    #[inline]
    pub fn open(&self) {
        self.post(SetOpen(Some(true)));
    }

    /// Closes the chat window.
    #[inline]
    pub fn close(&self) {
        self.post(SetOpen(Some(false)));
    }

    /// Opens the chat window if closed, closes it otherwise.
    #[inline]
    pub fn toggle(&self) {
        self.post(SetOpen(None));
    }

    /// Stops the widget, as when the host unmounts it.
    ///
    /// Answers still in flight are dropped, and every clone of this handle
    /// becomes inert: later calls are ignored and [`Chatbot::snapshot`]
    /// fails.
    #[inline]
    pub fn shutdown(&self) {
        debug!("shutting down");
        self.handle.stop();
    }

    /// Returns a copy of the current state.
    ///
    /// The snapshot reflects every call made before this one.
    pub async fn snapshot(&self) -> Result<ChatbotSnapshot, ActorDeadError> {
        let (tx, rx) = oneshot::channel();
        self.handle.send(TakeSnapshot(tx))?;
        rx.await.map_err(|_| ActorDeadError)
    }

    #[inline]
    fn post<M: nyang_actor::Message<ChatbotState>>(&self, msg: M) {
        if let Err(err) = self.handle.send(msg) {
            warn!("dropping an event: {err}");
        }
    }
}

impl Chatbot {
    fn spawn_from_builder(builder: ChatbotBuilder) -> Self {
        let ChatbotBuilder {
            service_client,
            navigator,
            config,
            initial_path,
            hooks,
        } = builder;

        let service_client =
            service_client.with_retry_policy(config.retry_policy);
        let state = ChatbotState {
            service_client,
            navigator,
            link_resolver: LinkResolver::new(config.origin.clone()),
            transcript: Transcript::with_greeting(&config.greeting),
            config: Arc::new(config),
            session: Session::default(),
            draft_input: String::new(),
            in_flight: None,
            pending_inputs: VecDeque::new(),
            quick_replies: Vec::new(),
            suggestions_token: None,
            is_open: false,
            current_path: NavigationEvent::new(initial_path)
                .pathname()
                .to_owned(),
            hooks,
        };
        Self {
            handle: Actor::spawn(state, Some("chatbot")),
        }
    }
}
