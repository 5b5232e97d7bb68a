//! A chat service that talks to the chatbot backend over HTTP.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use nyang_model::{
    ChatReply, ChatRequest, ChatService, ChatServiceError, ErrorKind,
    Suggestions, SuggestionsRequest,
};
use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use config::{HttpServiceConfig, HttpServiceConfigBuilder};

const CHAT_PATH: &str = "/api/chat";
const SUGGESTIONS_PATH: &str = "/api/chat/suggestions";

/// Error type for [`HttpChatService`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ChatServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Chat service backed by the `/api/chat` HTTP endpoints.
#[derive(Clone, Debug)]
pub struct HttpChatService {
    client: Client,
    config: Arc<HttpServiceConfig>,
}

impl HttpChatService {
    /// Creates a new `HttpChatService` with the given configuration.
    pub fn new(config: HttpServiceConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Transport))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    fn post_json<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
    ) -> impl Future<Output = Result<Resp, Error>> + Send + 'static
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned + Send + 'static,
    {
        let url = self.config.endpoint(path);
        trace!("posting to {url}");
        let mut builder = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }
        let resp_fut = builder.send();

        async move {
            let resp = resp_fut.await.map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;
            let resp = check_status(resp)?;
            check_content_type(&resp)?;

            let body = resp.bytes().await.map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;
            serde_json::from_slice(&body).map_err(|err| {
                Error::new(
                    format!("Malformed response body: {err}"),
                    ErrorKind::InvalidPayload,
                )
            })
        }
    }
}

fn check_status(resp: Response) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let kind = if status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        ErrorKind::Unavailable
    } else {
        ErrorKind::Rejected
    };
    Err(Error::new(format!("Unexpected status: {status}"), kind))
}

/// Accepts `application/json` and `application/*+json`. A missing header is
/// let through and left to the JSON parser.
fn check_content_type(resp: &Response) -> Result<(), Error> {
    let Some(content_type) = resp.headers().get(header::CONTENT_TYPE) else {
        debug!("response has no content type");
        return Ok(());
    };

    let is_json = content_type
        .to_str()
        .ok()
        .and_then(|v| v.parse::<Mime>().ok())
        .map(|m| {
            m.type_() == mime::APPLICATION
                && (m.subtype() == mime::JSON
                    || m.suffix() == Some(mime::JSON))
        })
        .unwrap_or(false);
    if !is_json {
        return Err(Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::InvalidPayload,
        ));
    }
    Ok(())
}

impl ChatService for HttpChatService {
    type Error = Error;

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        self.post_json(CHAT_PATH, req)
    }

    fn fetch_suggestions(
        &self,
        req: &SuggestionsRequest,
    ) -> impl Future<Output = Result<Suggestions, Self::Error>> + Send + 'static
    {
        self.post_json(SUGGESTIONS_PATH, req)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nyang_model::{Message, QuickReply};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn service(server: &MockServer) -> HttpChatService {
        let config = HttpServiceConfigBuilder::new()
            .with_base_url(server.uri())
            .build();
        HttpChatService::new(config).unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest {
            message: "환불 가능해?".to_owned(),
            history: vec![Message::bot("안녕하냥!")],
        }
    }

    #[tokio::test]
    async fn test_send_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "message": "환불 가능해?",
                "history": [{ "text": "안녕하냥!", "sender": "bot" }],
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "reply": "[환불](/refund)이다냥" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = service(&server).send_chat(&request()).await.unwrap();
        assert_eq!(reply.text(), Some("[환불](/refund)이다냥"));
    }

    #[tokio::test]
    async fn test_missing_reply_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let reply = service(&server).send_chat(&request()).await.unwrap();
        assert_eq!(reply.text(), None);
    }

    #[tokio::test]
    async fn test_fetch_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/suggestions"))
            .and(body_json(json!({ "current_path": "/cart" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestions": [
                    { "label": "결제 방법" },
                    {
                        "label": "배송비",
                        "cached_answer": "3만원 이상 무료다냥",
                        "link": "/shipping",
                    },
                ],
            })))
            .mount(&server)
            .await;

        let resp = service(&server)
            .fetch_suggestions(&SuggestionsRequest {
                current_path: "/cart".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(
            resp.suggestions,
            vec![
                QuickReply::new("결제 방법"),
                QuickReply::new("배송비")
                    .with_cached_answer("3만원 이상 무료다냥")
                    .with_link("/shipping"),
            ]
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (429, ErrorKind::Unavailable),
            (503, ErrorKind::Unavailable),
            (400, ErrorKind::Rejected),
            (404, ErrorKind::Rejected),
        ];
        for (status, kind) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(
                    ResponseTemplate::new(status)
                        .set_body_json(json!({ "error": "nope" })),
                )
                .mount(&server)
                .await;

            let err = service(&server).send_chat(&request()).await.unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_invalid_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html></html>", "text/html"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat/suggestions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"suggestions\": [", "application/json"),
            )
            .mount(&server)
            .await;

        let service = service(&server);
        let err = service.send_chat(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);

        let err = service
            .fetch_suggestions(&SuggestionsRequest {
                current_path: "/".to_owned(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = HttpServiceConfigBuilder::new()
            .with_base_url(format!("http://127.0.0.1:{port}"))
            .build();
        let service = HttpChatService::new(config).unwrap();

        let err = service.send_chat(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "reply": "늦었다냥" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = HttpServiceConfigBuilder::new()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(50))
            .build();
        let service = HttpChatService::new(config).unwrap();
        let err = service.send_chat(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "reply": "ok" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = HttpServiceConfigBuilder::new()
            .with_base_url(server.uri())
            .with_bearer_token("secret")
            .build();
        let service = HttpChatService::new(config).unwrap();
        let reply = service.send_chat(&request()).await.unwrap();
        assert_eq!(reply.text(), Some("ok"));
    }
}
