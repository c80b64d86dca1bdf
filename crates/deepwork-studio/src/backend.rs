use deepwork_engine::modes::ModeId;
use deepwork_engine::session::{SessionBackend, SessionError, SessionId};

/// Session backend that only logs. Ids are local and sequential.
#[derive(Debug, Default)]
pub struct LogSessionBackend {
    next: u64,
}

impl SessionBackend for LogSessionBackend {
    fn start_session(&mut self, mode: ModeId, estimated_secs: u32) -> Result<SessionId, SessionError> {
        self.next += 1;
        let id = SessionId(format!("local-{}", self.next));
        log::info!("[backend] start {id}: mode={mode} estimated={estimated_secs}s");
        Ok(id)
    }

    fn end_session(&mut self, id: &SessionId, interruptions: u32) -> Result<(), SessionError> {
        log::info!("[backend] end {id}: interruptions={interruptions}");
        Ok(())
    }
}
