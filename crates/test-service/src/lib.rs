//! A local fake chat service for testing purpose.

mod preset;

use std::collections::{HashMap, VecDeque};
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use nyang_model::{
    ChatReply, ChatRequest, ChatService, ChatServiceError, ErrorKind,
    QuickReply, Suggestions, SuggestionsRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn message(&self) -> &str {
        self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ChatServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

struct ScriptedReply {
    preset: PresetReply,
    attempts: u64,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<ScriptedReply>,
    // `None` makes requests for that path fail.
    suggestions: HashMap<String, Option<Vec<QuickReply>>>,
    delay: Option<Duration>,
    chat_requests: Vec<ChatRequest>,
    suggestions_requests: Vec<SuggestionsRequest>,
}

impl Script {
    fn next_reply(&mut self) -> (Result<ChatReply, Error>, Option<Duration>) {
        let Some(front) = self.replies.front_mut() else {
            return (
                Err(Error {
                    message: "no more preset replies",
                    kind: ErrorKind::Rejected,
                }),
                self.delay,
            );
        };

        let delay = front.preset.delay().or(self.delay);
        front.attempts += 1;
        let should_fail = match front.preset.failures {
            Some(0) => true,
            Some(failures) => front.attempts <= failures,
            None => false,
        };
        if should_fail {
            return (
                Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::Unavailable,
                }),
                delay,
            );
        }

        let reply = self
            .replies
            .pop_front()
            .map(|scripted| ChatReply {
                reply: scripted.preset.reply,
            })
            .unwrap_or_default();
        (Ok(reply), delay)
    }
}

/// A local fake chat service for testing purpose.
///
/// Chat requests are answered by the added preset replies in order. If there
/// are no more presets, an error is returned. Suggestions are looked up by
/// the requested path, unknown paths get an empty list.
///
/// Clones share the same script, and every request is recorded so tests can
/// inspect what the widget sent.
///
/// # Note
///
/// This type is not optimized for production use. You should only use it
/// for testing.
#[derive(Clone, Default)]
pub struct TestChatService {
    script: Arc<Mutex<Script>>,
}

impl TestChatService {
    #[inline]
    pub fn add_reply(&self, preset: PresetReply) {
        self.lock().replies.push_back(ScriptedReply {
            preset,
            attempts: 0,
        });
    }

    #[inline]
    pub fn set_suggestions(
        &self,
        path: impl Into<String>,
        suggestions: Vec<QuickReply>,
    ) {
        self.lock().suggestions.insert(path.into(), Some(suggestions));
    }

    #[inline]
    pub fn fail_suggestions(&self, path: impl Into<String>) {
        self.lock().suggestions.insert(path.into(), None);
    }

    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.lock().delay = Some(duration);
    }

    /// Returns every chat request received so far.
    #[inline]
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.lock().chat_requests.clone()
    }

    /// Returns every suggestions request received so far.
    #[inline]
    pub fn suggestions_requests(&self) -> Vec<SuggestionsRequest> {
        self.lock().suggestions_requests.clone()
    }

    /// Returns the number of requests of any kind received so far.
    #[inline]
    pub fn request_count(&self) -> usize {
        let script = self.lock();
        script.chat_requests.len() + script.suggestions_requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not hide the script from the others.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Debug for TestChatService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let script = self.lock();
        f.debug_struct("TestChatService")
            .field("remaining_replies", &script.replies.len())
            .field("chat_requests", &script.chat_requests.len())
            .finish_non_exhaustive()
    }
}

impl ChatService for TestChatService {
    type Error = crate::Error;

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let (result, delay) = {
            let mut script = self.lock();
            script.chat_requests.push(req.clone());
            script.next_reply()
        };
        async move {
            sleep(delay.unwrap_or(Duration::from_millis(1))).await;
            result
        }
    }

    fn fetch_suggestions(
        &self,
        req: &SuggestionsRequest,
    ) -> impl Future<Output = Result<Suggestions, Self::Error>> + Send + 'static
    {
        let (result, delay) = {
            let mut script = self.lock();
            script.suggestions_requests.push(req.clone());
            let result = match script.suggestions.get(&req.current_path) {
                Some(Some(suggestions)) => Ok(Suggestions {
                    suggestions: suggestions.clone(),
                }),
                Some(None) => Err(Error {
                    message: "preset suggestions failure",
                    kind: ErrorKind::Unavailable,
                }),
                None => Ok(Suggestions::default()),
            };
            (result, script.delay)
        };
        async move {
            sleep(delay.unwrap_or(Duration::from_millis(1))).await;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use nyang_model::Message;

    use super::*;

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_owned(),
            history: vec![Message::bot("안녕하냥!")],
        }
    }

    #[tokio::test]
    async fn test_replies_in_order() {
        let service = TestChatService::default();
        service.add_reply(PresetReply::with_text("첫 번째"));
        service.add_reply(PresetReply::empty());

        let reply = service.send_chat(&request("a")).await.unwrap();
        assert_eq!(reply.text(), Some("첫 번째"));
        let reply = service.send_chat(&request("b")).await.unwrap();
        assert_eq!(reply.text(), None);

        let err = service.send_chat(&request("c")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);

        let requests = service.chat_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].message, "b");
    }

    #[tokio::test]
    async fn test_failures_before_success() {
        let service = TestChatService::default();
        service.add_reply(PresetReply::with_text("ok").with_failures(2));

        for _ in 0..2 {
            let err = service.send_chat(&request("a")).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unavailable);
        }
        let reply = service.send_chat(&request("a")).await.unwrap();
        assert_eq!(reply.text(), Some("ok"));
    }

    #[tokio::test]
    async fn test_suggestions_by_path() {
        let service = TestChatService::default();
        service.set_suggestions("/cart", vec![QuickReply::new("결제 방법")]);
        service.fail_suggestions("/broken");

        let resp = service
            .fetch_suggestions(&SuggestionsRequest {
                current_path: "/cart".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(resp.suggestions, vec![QuickReply::new("결제 방법")]);

        let resp = service
            .fetch_suggestions(&SuggestionsRequest {
                current_path: "/unknown".to_owned(),
            })
            .await
            .unwrap();
        assert!(resp.suggestions.is_empty());

        let result = service
            .fetch_suggestions(&SuggestionsRequest {
                current_path: "/broken".to_owned(),
            })
            .await;
        assert!(result.is_err());
        assert_eq!(service.request_count(), 3);
    }
}
