//! Session reset policy.
//!
//! A session begins when the widget is created and ends at every navigation
//! the widget didn't trigger itself. Sessions are numbered by a generation
//! counter so that answers to requests made in an earlier session can be
//! recognized and dropped.

use serde::Serialize;

use crate::navigation::NavigationEvent;

/// Identifies a session. Bumped on every reset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What to do with the conversation after a navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetDecision {
    /// Start over with a fresh greeting.
    Reset,
    /// Keep the transcript and any request in flight.
    Preserve,
}

/// Decides whether a navigation ends the current session.
///
/// Navigations triggered by the widget keep the conversation, so users can
/// follow suggested links without losing context. Anything else, including
/// navigations without state, resets it.
#[inline]
pub fn decide(event: &NavigationEvent) -> ResetDecision {
    if event.is_from_chatbot() {
        ResetDecision::Preserve
    } else {
        ResetDecision::Reset
    }
}

/// Tags a request with the session it was made in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RequestToken {
    pub generation: Generation,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Session {
    generation: Generation,
    next_seq: u64,
}

impl Session {
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn reset(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.generation
    }

    pub fn issue_token(&mut self) -> RequestToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        RequestToken {
            generation: self.generation,
            seq,
        }
    }

    #[inline]
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationState;

    #[test]
    fn test_decide() {
        let events = [
            (NavigationEvent::new("/products"), ResetDecision::Reset),
            (
                NavigationEvent::with_state("/help", NavigationState::FROM_CHATBOT),
                ResetDecision::Preserve,
            ),
            (
                NavigationEvent::with_state("/cart", NavigationState::default()),
                ResetDecision::Reset,
            ),
        ];
        for (event, expected) in events {
            assert_eq!(decide(&event), expected, "{event:?}");
        }
    }

    #[test]
    fn test_tokens_across_reset() {
        let mut session = Session::default();
        let first = session.issue_token();
        let second = session.issue_token();
        assert_ne!(first, second);
        assert!(session.is_current(first));

        let generation = session.reset();
        assert_eq!(generation.get(), 1);
        assert!(!session.is_current(first));
        let token = session.issue_token();
        assert!(session.is_current(token));
    }
}
