use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::time::Duration;

use nyang_model::{
    ChatReply, ChatRequest, ChatService, ChatServiceError, ErrorKind, Message,
    QuickReply, Sender, Suggestions, SuggestionsRequest,
};
use tokio::time::sleep;

#[derive(Debug)]
struct EchoServiceError(ErrorKind);

impl Display for EchoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoServiceError {}

impl ChatServiceError for EchoServiceError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Answers with the question and the number of history turns it saw.
struct EchoService;

impl ChatService for EchoService {
    type Error = EchoServiceError;

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let result = if req.message.is_empty() {
            Err(EchoServiceError(ErrorKind::Rejected))
        } else {
            Ok(ChatReply::with_text(format!(
                "You said {} after {} turns",
                req.message,
                req.history.len()
            )))
        };
        async move {
            sleep(Duration::from_millis(1)).await;
            result
        }
    }

    fn fetch_suggestions(
        &self,
        req: &SuggestionsRequest,
    ) -> impl Future<Output = Result<Suggestions, Self::Error>> + Send + 'static
    {
        let suggestions = if req.current_path.starts_with("/product") {
            vec![QuickReply::new("재고가 있나요?")]
        } else {
            vec![]
        };
        ready(Ok(Suggestions { suggestions }))
    }
}

#[tokio::test]
async fn test_chat() {
    let service = EchoService;
    let req = ChatRequest {
        message: "Good morning".to_owned(),
        history: vec![Message::bot("안녕하냥!")],
    };
    let reply = service.send_chat(&req).await.unwrap();
    assert_eq!(reply.text(), Some("You said Good morning after 1 turns"));
    assert_eq!(req.history[0].sender, Sender::Bot);
}

#[tokio::test]
async fn test_error() {
    let service = EchoService;
    let req = ChatRequest {
        message: String::new(),
        history: vec![],
    };
    let err = service.send_chat(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert!(!err.kind().is_transient());
}

#[tokio::test]
async fn test_suggestions() {
    let service = EchoService;
    let resp = service
        .fetch_suggestions(&SuggestionsRequest {
            current_path: "/product/3".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(resp.suggestions.len(), 1);

    let resp = service
        .fetch_suggestions(&SuggestionsRequest {
            current_path: "/".to_owned(),
        })
        .await
        .unwrap();
    assert!(resp.suggestions.is_empty());
}
