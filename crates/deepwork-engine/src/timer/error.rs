use std::fmt;

/// Errors reported by `FocusTimer` configuration calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Durations must be at least one second.
    InvalidDuration(u32),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidDuration(secs) => {
                write!(f, "invalid timer duration: {secs}s (must be at least 1s)")
            }
        }
    }
}

impl std::error::Error for TimerError {}
