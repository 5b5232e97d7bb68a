//! The in-app router as seen by the widget.

/// State attached to an in-app navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NavigationState {
    /// Whether the widget itself triggered the navigation, by following a
    /// link in a reply or a quick reply.
    pub from_chatbot: bool,
}

impl NavigationState {
    /// State for navigations triggered by the widget.
    pub const FROM_CHATBOT: Self = Self { from_chatbot: true };
}

/// A navigation that happened in the host application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NavigationEvent {
    /// The new location, possibly with a query string.
    pub path: String,
    /// The state attached to the navigation, if any.
    pub state: Option<NavigationState>,
}

impl NavigationEvent {
    /// Creates an event for a navigation without attached state, such as
    /// the user clicking a regular link.
    #[inline]
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }

    /// Creates an event for a navigation with the given state.
    #[inline]
    pub fn with_state<S: Into<String>>(
        path: S,
        state: NavigationState,
    ) -> Self {
        Self {
            path: path.into(),
            state: Some(state),
        }
    }

    /// Returns `true` if the widget triggered this navigation.
    #[inline]
    pub fn is_from_chatbot(&self) -> bool {
        self.state.is_some_and(|s| s.from_chatbot)
    }

    /// Returns the path without the query string and fragment.
    pub fn pathname(&self) -> &str {
        let end = self.path.find(['?', '#']).unwrap_or(self.path.len());
        &self.path[..end]
    }
}

/// The navigation primitive of the host application.
///
/// Implementations should report the resulting navigation back to the
/// widget through [`Chatbot::navigated`](crate::Chatbot::navigated), the
/// same way they do for navigations the user makes.
pub trait Navigator: Send + Sync + 'static {
    /// Navigates inside the application.
    fn navigate(&self, path: &str, state: NavigationState);

    /// Opens a URL in a new, unrelated browsing context.
    fn open_external(&self, url: &str);
}
