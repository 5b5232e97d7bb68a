use std::pin::Pin;
use std::sync::Arc;

use backoff::ExponentialBackoffBuilder;
use nyang_model::{
    ChatReply, ChatRequest, ChatService, ChatServiceError, Suggestions,
    SuggestionsRequest,
};
use tracing::Instrument;

use crate::config::RetryPolicy;

pub(crate) type ServiceResult<T> = Result<T, Box<dyn ChatServiceError>>;
type BoxedFuture<T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send>>;
#[rustfmt::skip]
type ChatFn = Arc<
    dyn Fn(ChatRequest, Option<RetryPolicy>) -> BoxedFuture<ChatReply>
        + Send + Sync
>;
#[rustfmt::skip]
type SuggestionsFn = Arc<
    dyn Fn(SuggestionsRequest, Option<RetryPolicy>) -> BoxedFuture<Suggestions>
        + Send + Sync
>;

/// A wrapper around a chat service that provides a type-erased interface
/// for the other modules.
#[derive(Clone)]
pub(crate) struct ServiceClient {
    chat_fn: ChatFn,
    suggestions_fn: SuggestionsFn,
    retry_policy: Option<RetryPolicy>,
}

impl ServiceClient {
    pub fn new<S: ChatService + 'static>(service: S) -> Self {
        // `ServiceClient` has no generic parameter, so the service type is
        // erased behind the two handler closures.
        let service = Arc::new(service);

        let chat_fn: ChatFn = {
            let service = Arc::clone(&service);
            Arc::new(move |req: ChatRequest, policy: Option<RetryPolicy>| {
                let service = Arc::clone(&service);
                let fut = async move {
                    trace!("got a request: {req:?}");
                    let result =
                        with_retry(policy, || service.send_chat(&req)).await;
                    trace!("finished a request");
                    result.map_err(box_error)
                };
                Box::pin(fut.instrument(trace_span!("chat req")))
                    as BoxedFuture<ChatReply>
            })
        };

        let suggestions_fn: SuggestionsFn = Arc::new(
            move |req: SuggestionsRequest, policy: Option<RetryPolicy>| {
                let service = Arc::clone(&service);
                let fut = async move {
                    trace!("got a request: {req:?}");
                    with_retry(policy, || service.fetch_suggestions(&req))
                        .await
                        .map_err(box_error)
                };
                Box::pin(fut.instrument(trace_span!("suggestions req")))
                    as BoxedFuture<Suggestions>
            },
        );

        Self {
            chat_fn,
            suggestions_fn,
            retry_policy: None,
        }
    }

    #[inline]
    pub fn with_retry_policy(mut self, policy: Option<RetryPolicy>) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sends a chat request and returns the reply.
    #[inline]
    pub async fn send_chat(&self, req: ChatRequest) -> ServiceResult<ChatReply> {
        (self.chat_fn)(req, self.retry_policy).await
    }

    /// Fetches quick replies for a page.
    #[inline]
    pub async fn fetch_suggestions(
        &self,
        req: SuggestionsRequest,
    ) -> ServiceResult<Suggestions> {
        (self.suggestions_fn)(req, self.retry_policy).await
    }
}

#[inline]
fn box_error<E: ChatServiceError>(err: E) -> Box<dyn ChatServiceError> {
    Box::new(err)
}

async fn with_retry<T, E, F, Fut>(
    policy: Option<RetryPolicy>,
    mut op: F,
) -> Result<T, E>
where
    E: ChatServiceError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let Some(policy) = policy else {
        return op().await;
    };

    let backoff = ExponentialBackoffBuilder::new()
        .with_initial_interval(policy.initial_interval)
        .with_max_elapsed_time(Some(policy.max_elapsed_time))
        .build();
    backoff::future::retry(backoff, || {
        let fut = op();
        async move {
            fut.await.map_err(|err| {
                if err.kind().is_transient() {
                    debug!("transient error, will retry: {err}");
                    backoff::Error::transient(err)
                } else {
                    backoff::Error::permanent(err)
                }
            })
        }
    })
    .await
}
