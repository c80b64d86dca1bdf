//! Focus-session reporting hooks.
//!
//! The engine does not talk to any backend itself. Hosts implement
//! `SessionBackend` and drive a `SessionTracker` from timer transitions.

mod error;
mod tracker;

pub use error::SessionError;
pub use tracker::SessionTracker;

use crate::modes::ModeId;

/// Opaque backend handle for a started session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consumer-provided session store.
pub trait SessionBackend {
    fn start_session(&mut self, mode: ModeId, estimated_secs: u32) -> Result<SessionId, SessionError>;

    fn end_session(&mut self, id: &SessionId, interruptions: u32) -> Result<(), SessionError>;
}
