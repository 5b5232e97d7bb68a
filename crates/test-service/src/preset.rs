use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The preset answer for one chat request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// The `reply` field of the response. `None` simulates a service that
    /// answered without generating anything.
    pub reply: Option<String>,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
    /// Milliseconds to wait before answering, overriding the service delay.
    pub delay_ms: Option<u64>,
}

impl PresetReply {
    /// Creates a `PresetReply` answering with the specified text.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a `PresetReply` whose response has no `reply` field.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a `PresetReply` that always fails.
    #[inline]
    pub fn failing() -> Self {
        Self::default().with_failures(0)
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Delays this answer.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = Some(delay.as_millis() as u64);
        self
    }

    #[inline]
    pub(crate) fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let preset = PresetReply::with_text("[환불안내](/help/refund)")
            .with_failures(2)
            .with_delay(Duration::from_millis(30));

        let serialized = serde_json::to_string(&preset).unwrap();
        let deserialized: PresetReply =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(preset, deserialized);
        assert_eq!(deserialized.delay(), Some(Duration::from_millis(30)));
    }
}
