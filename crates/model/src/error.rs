use std::fmt::{self, Display};

/// The kind of error that occurred while talking to a chat service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never reached the service, or the connection broke.
    Transport,
    /// The service is temporarily unable to answer (rate limited, 5xx).
    Unavailable,
    /// The service refused the request (4xx other than rate limiting).
    Rejected,
    /// The service answered with a body that could not be understood.
    InvalidPayload,
}

impl ErrorKind {
    /// Returns `true` if retrying the same request may succeed.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::Unavailable)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Unavailable => write!(f, "Service unavailable"),
            ErrorKind::Rejected => write!(f, "Request rejected"),
            ErrorKind::InvalidPayload => write!(f, "Invalid payload"),
        }
    }
}
