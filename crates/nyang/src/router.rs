use std::sync::{Arc, Mutex, MutexGuard};

use nyang_core::{NavigationEvent, NavigationState, Navigator};
use tokio::sync::mpsc;

/// Something that happened in a [`Router`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterEvent {
    /// The current page changed. Forward it to
    /// [`Chatbot::navigated`](nyang_core::Chatbot::navigated).
    Navigated(NavigationEvent),
    /// A URL outside the application was requested.
    OpenedExternal(String),
}

struct Inner {
    history: Vec<String>,
    external: Vec<String>,
}

/// An in-memory router for hosts that have no real one.
///
/// Every navigation is pushed onto the history and reported on the event
/// channel returned by [`Router::new`]. Clones share the same history.
#[derive(Clone)]
pub struct Router {
    inner: Arc<Mutex<Inner>>,
    event_tx: mpsc::UnboundedSender<RouterEvent>,
}

impl Router {
    /// Creates a router on `initial_path`, along with the receiving end of
    /// its events.
    pub fn new<S: Into<String>>(
        initial_path: S,
    ) -> (Self, mpsc::UnboundedReceiver<RouterEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let router = Self {
            inner: Arc::new(Mutex::new(Inner {
                history: vec![initial_path.into()],
                external: Vec::new(),
            })),
            event_tx,
        };
        (router, event_rx)
    }

    /// Navigates the way a user does, without any attached state.
    #[inline]
    pub fn push<S: Into<String>>(&self, path: S) {
        self.go(NavigationEvent::new(path));
    }

    /// Returns the current location.
    pub fn current(&self) -> String {
        // The history always holds the initial path.
        self.lock().history.last().cloned().unwrap_or_default()
    }

    /// Returns every location visited so far, oldest first.
    #[inline]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Returns every external URL opened so far.
    #[inline]
    pub fn opened_external(&self) -> Vec<String> {
        self.lock().external.clone()
    }

    fn go(&self, event: NavigationEvent) {
        debug!("navigating to {}", event.path);
        self.lock().history.push(event.path.clone());
        self.emit(RouterEvent::Navigated(event));
    }

    #[inline]
    fn emit(&self, event: RouterEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("nobody is listening to router events");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for Router {
    #[inline]
    fn navigate(&self, path: &str, state: NavigationState) {
        self.go(NavigationEvent::with_state(path, state));
    }

    fn open_external(&self, url: &str) {
        debug!("opening {url}");
        self.lock().external.push(url.to_owned());
        self.emit(RouterEvent::OpenedExternal(url.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history() {
        let (router, mut event_rx) = Router::new("/");
        router.push("/cart?step=1");
        router.navigate("/refund", NavigationState::FROM_CHATBOT);
        router.open_external("https://other.example/");

        assert_eq!(router.current(), "/refund");
        assert_eq!(router.history(), vec!["/", "/cart?step=1", "/refund"]);
        assert_eq!(router.opened_external(), vec!["https://other.example/"]);

        assert_eq!(
            event_rx.try_recv().unwrap(),
            RouterEvent::Navigated(NavigationEvent::new("/cart?step=1"))
        );
        assert!(matches!(
            event_rx.try_recv().unwrap(),
            RouterEvent::Navigated(event) if event.is_from_chatbot()
        ));
        assert_eq!(
            event_rx.try_recv().unwrap(),
            RouterEvent::OpenedExternal("https://other.example/".to_owned())
        );
    }
}
