use crate::modes::ModeId;

use super::{SessionBackend, SessionError, SessionId};

#[derive(Debug, Clone)]
struct ActiveSession {
    id: SessionId,
    mode: ModeId,
    interruptions: u32,
}

/// Tracks the active backend session and counts interruptions.
///
/// An interruption is a pause while a session is active.
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Option<ActiveSession>,
    completed: u32,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref().map(|s| &s.id)
    }

    pub fn active_mode(&self) -> Option<ModeId> {
        self.active.as_ref().map(|s| s.mode)
    }

    /// Interruptions counted in the active session (0 when idle).
    pub fn interruptions(&self) -> u32 {
        self.active.as_ref().map_or(0, |s| s.interruptions)
    }

    /// Sessions ended through this tracker.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Starts a backend session unless one is already active.
    pub fn begin(
        &mut self,
        backend: &mut dyn SessionBackend,
        mode: ModeId,
        estimated_secs: u32,
    ) -> Result<&SessionId, SessionError> {
        if let Some(active) = &self.active {
            return Err(SessionError::AlreadyActive(active.id.0.clone()));
        }

        let id = backend.start_session(mode, estimated_secs)?;
        log::info!("session {id} started ({mode}, {estimated_secs}s)");
        let active = self.active.insert(ActiveSession { id, mode, interruptions: 0 });
        Ok(&active.id)
    }

    /// Counts one interruption if a session is active.
    pub fn interrupt(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.interruptions += 1;
            log::debug!("session {} interrupted ({} so far)", active.id, active.interruptions);
        }
    }

    /// Ends the active session. The tracker is idle afterwards even when the
    /// backend call fails.
    pub fn end(&mut self, backend: &mut dyn SessionBackend) -> Result<u32, SessionError> {
        let active = self.active.take().ok_or(SessionError::NotStarted)?;
        backend.end_session(&active.id, active.interruptions)?;
        self.completed += 1;
        log::info!("session {} ended with {} interruptions", active.id, active.interruptions);
        Ok(active.interruptions)
    }
}
