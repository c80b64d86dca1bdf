use std::fmt;

/// Failures reported by a `SessionBackend` or the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The backend refused or failed the call.
    Backend(String),
    /// `end` was called with no active session.
    NotStarted,
    /// `start` was called while a session is active.
    AlreadyActive(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Backend(msg) => write!(f, "session backend error: {msg}"),
            SessionError::NotStarted => f.write_str("no active session"),
            SessionError::AlreadyActive(id) => write!(f, "session {id} is already active"),
        }
    }
}

impl std::error::Error for SessionError {}
