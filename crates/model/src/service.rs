use std::error::Error;

use crate::error::ErrorKind;
use crate::request::{ChatRequest, SuggestionsRequest};
use crate::response::{ChatReply, Suggestions};

/// The error type for a chat service.
pub trait ChatServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents the remote chat backend.
///
/// Once the service is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the service should be prepared for being dropped anytime.
pub trait ChatService: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: ChatServiceError;

    /// Asks the chat endpoint for an answer.
    ///
    /// The returned future must not borrow `self` or `req`.
    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static;

    /// Asks the suggestions endpoint for quick replies.
    fn fetch_suggestions(
        &self,
        req: &SuggestionsRequest,
    ) -> impl Future<Output = Result<Suggestions, Self::Error>> + Send + 'static;
}
