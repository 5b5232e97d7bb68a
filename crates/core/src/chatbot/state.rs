use nyang_actor::{Actor, Message as ActorMessage};
use nyang_model::{
    ChatReply, ChatRequest, Message, QuickReply, Suggestions,
    SuggestionsRequest,
};
use tokio::sync::oneshot;

use super::{ChatbotSnapshot, ChatbotState};
use crate::link::LinkAction;
use crate::navigation::{NavigationEvent, NavigationState};
use crate::service_client::ServiceResult;
use crate::session::{self, RequestToken, ResetDecision};

impl ChatbotState {
    fn send_user_message(&mut self, text: String, handle: &Actor<Self>) {
        if text.trim().is_empty() {
            trace!("ignoring a blank message");
            return;
        }
        if self.in_flight.is_some() {
            // Only one request at a time. The input is shown once it is
            // actually sent.
            debug!("a request is in flight, queueing the message");
            self.pending_inputs.push_back(text);
            return;
        }
        self.dispatch_chat(text, handle);
    }

    /// Sends `text` to the chat service, assuming nothing is in flight.
    fn dispatch_chat(&mut self, text: String, handle: &Actor<Self>) {
        // The history is taken before the question itself is appended.
        let history = self
            .transcript
            .trailing_window(self.config.history_window)
            .to_vec();
        self.append(Message::user(text.clone()));

        let token = self.session.issue_token();
        self.in_flight = Some(token);

        let request = ChatRequest {
            message: text,
            history,
        };
        let service_client = self.service_client.clone();
        let weak_handle = handle.downgrade();
        tokio::spawn(async move {
            let result = service_client.send_chat(request).await;
            weak_handle.send(ChatFinished { token, result }).ok();
        });
    }

    fn finish_chat(
        &mut self,
        token: RequestToken,
        result: ServiceResult<ChatReply>,
        handle: &Actor<Self>,
    ) {
        if self.in_flight != Some(token) {
            if self.session.is_current(token) {
                warn!("got an answer for an unknown request: {token:?}");
            } else {
                debug!("discarding an answer from a previous session");
            }
            return;
        }
        self.in_flight = None;

        let text = match result {
            Ok(reply) => match reply.text() {
                Some(text) => text.to_owned(),
                None => {
                    warn!("chat service returned no reply");
                    self.config.no_reply_text.clone()
                }
            },
            Err(err) => {
                error!("chat request failed: {err}");
                self.config.error_text.clone()
            }
        };
        self.append(Message::bot(text));
        self.process_next_input(handle);
    }

    fn process_next_input(&mut self, handle: &Actor<Self>) {
        if self.in_flight.is_some() {
            return;
        }
        if let Some(input) = self.pending_inputs.pop_front() {
            self.dispatch_chat(input, handle);
        } else {
            self.notify_idle();
        }
    }

    #[inline]
    fn notify_idle(&self) {
        if let Some(on_idle) = &self.hooks.on_idle {
            on_idle();
        }
    }

    fn select_quick_reply(&mut self, reply: QuickReply, handle: &Actor<Self>) {
        let QuickReply {
            label,
            cached_answer,
            link,
        } = reply;

        // Empty fields count as absent.
        let link = link.filter(|link| !link.is_empty());
        let cached_answer = cached_answer.filter(|answer| !answer.is_empty());
        let Some(answer) = cached_answer else {
            self.send_user_message(label, handle);
            return;
        };

        self.append(Message::user(label));
        self.append(Message::bot(answer));
        if let Some(link) = link {
            self.navigator.navigate(&link, NavigationState::FROM_CHATBOT);
        }
        if self.in_flight.is_none() {
            self.notify_idle();
        }
    }

    fn navigated(&mut self, event: NavigationEvent, handle: &Actor<Self>) {
        self.current_path = event.pathname().to_owned();
        match session::decide(&event) {
            ResetDecision::Reset => self.reset(),
            ResetDecision::Preserve => {
                debug!("keeping the conversation on {}", event.path);
            }
        }
        if self.is_open {
            self.refresh_quick_replies(handle);
        }
    }

    fn reset(&mut self) {
        let generation = self.session.reset();
        debug!("starting session {}", generation.get());

        self.transcript.reset(&self.config.greeting);
        self.draft_input.clear();
        self.in_flight = None;
        self.pending_inputs.clear();
        self.suggestions_token = None;
        if let Some(on_reset) = &self.hooks.on_reset {
            on_reset();
        }
    }

    fn set_open(&mut self, open: Option<bool>, handle: &Actor<Self>) {
        let open = open.unwrap_or(!self.is_open);
        if open == self.is_open {
            return;
        }
        self.is_open = open;
        if open {
            self.refresh_quick_replies(handle);
        }
    }

    fn refresh_quick_replies(&mut self, handle: &Actor<Self>) {
        // A later refresh supersedes any earlier one still in flight.
        let token = self.session.issue_token();
        self.suggestions_token = Some(token);

        let request = SuggestionsRequest {
            current_path: self.current_path.clone(),
        };
        let service_client = self.service_client.clone();
        let weak_handle = handle.downgrade();
        tokio::spawn(async move {
            let result = service_client.fetch_suggestions(request).await;
            weak_handle.send(SuggestionsLoaded { token, result }).ok();
        });
    }

    fn finish_suggestions(
        &mut self,
        token: RequestToken,
        result: ServiceResult<Suggestions>,
    ) {
        if self.suggestions_token != Some(token) {
            debug!("discarding outdated quick replies");
            return;
        }
        self.suggestions_token = None;

        self.quick_replies = match result {
            Ok(resp) => resp.suggestions,
            Err(err) => {
                warn!("failed to load quick replies: {err}");
                Vec::new()
            }
        };
        if let Some(on_quick_replies) = &self.hooks.on_quick_replies {
            on_quick_replies(&self.quick_replies);
        }
    }

    fn follow_link(&mut self, target_url: &str) {
        match self.link_resolver.resolve(target_url) {
            LinkAction::Navigate { path, state } => {
                self.navigator.navigate(&path, state);
            }
            LinkAction::OpenExternal(url) => {
                self.navigator.open_external(&url);
            }
        }
    }

    fn append(&mut self, msg: Message) {
        if let Some(on_message) = &self.hooks.on_message {
            on_message(&msg);
        }
        self.transcript.push(msg);
    }

    fn snapshot(&self) -> ChatbotSnapshot {
        ChatbotSnapshot {
            transcript: self.transcript.messages().to_vec(),
            pending: self.in_flight.is_some(),
            queued_inputs: self.pending_inputs.len(),
            draft_input: self.draft_input.clone(),
            quick_replies: self.quick_replies.clone(),
            is_open: self.is_open,
            current_path: self.current_path.clone(),
            generation: self.session.generation(),
        }
    }
}

#[derive(Debug)]
pub(super) struct SendUserMessage(pub String);

impl ActorMessage<ChatbotState> for SendUserMessage {
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        state.send_user_message(self.0, handle);
    }
}

#[derive(Debug)]
pub(super) struct SetDraft(pub String);

impl ActorMessage<ChatbotState> for SetDraft {
    #[inline]
    fn handle(self, state: &mut ChatbotState, _handle: &Actor<ChatbotState>) {
        state.draft_input = self.0;
    }
}

#[derive(Debug)]
pub(super) struct SubmitDraft;

impl ActorMessage<ChatbotState> for SubmitDraft {
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        if state.draft_input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut state.draft_input);
        state.send_user_message(text, handle);
    }
}

#[derive(Debug)]
pub(super) struct SelectQuickReply(pub QuickReply);

impl ActorMessage<ChatbotState> for SelectQuickReply {
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        state.select_quick_reply(self.0, handle);
    }
}

#[derive(Debug)]
pub(super) struct SelectQuickReplyAt(pub usize);

impl ActorMessage<ChatbotState> for SelectQuickReplyAt {
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        let Some(reply) = state.quick_replies.get(self.0).cloned() else {
            warn!("no quick reply at index {}", self.0);
            return;
        };
        state.select_quick_reply(reply, handle);
    }
}

#[derive(Debug)]
pub(super) struct RefreshQuickReplies;

impl ActorMessage<ChatbotState> for RefreshQuickReplies {
    #[inline]
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        state.refresh_quick_replies(handle);
    }
}

#[derive(Debug)]
pub(super) struct FollowLink(pub String);

impl ActorMessage<ChatbotState> for FollowLink {
    #[inline]
    fn handle(self, state: &mut ChatbotState, _handle: &Actor<ChatbotState>) {
        state.follow_link(&self.0);
    }
}

#[derive(Debug)]
pub(super) struct Navigated(pub NavigationEvent);

impl ActorMessage<ChatbotState> for Navigated {
    #[inline]
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        state.navigated(self.0, handle);
    }
}

/// `None` toggles.
#[derive(Debug)]
pub(super) struct SetOpen(pub Option<bool>);

impl ActorMessage<ChatbotState> for SetOpen {
    #[inline]
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        state.set_open(self.0, handle);
    }
}

#[derive(Debug)]
pub(super) struct TakeSnapshot(pub oneshot::Sender<ChatbotSnapshot>);

impl ActorMessage<ChatbotState> for TakeSnapshot {
    #[inline]
    fn handle(self, state: &mut ChatbotState, _handle: &Actor<ChatbotState>) {
        self.0.send(state.snapshot()).ok();
    }
}

#[derive(Debug)]
struct ChatFinished {
    token: RequestToken,
    result: ServiceResult<ChatReply>,
}

impl ActorMessage<ChatbotState> for ChatFinished {
    fn handle(self, state: &mut ChatbotState, handle: &Actor<ChatbotState>) {
        state.finish_chat(self.token, self.result, handle);
    }
}

#[derive(Debug)]
struct SuggestionsLoaded {
    token: RequestToken,
    result: ServiceResult<Suggestions>,
}

impl ActorMessage<ChatbotState> for SuggestionsLoaded {
    #[inline]
    fn handle(self, state: &mut ChatbotState, _handle: &Actor<ChatbotState>) {
        state.finish_suggestions(self.token, self.result);
    }
}
