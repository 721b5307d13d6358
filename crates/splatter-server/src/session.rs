use splatter_core::types::SessionId;

/// Connection lifecycle of a player session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Connecting,
    Connected,
    InGame,
    Disconnected,
}

/// Raised by the session service whenever a session changes status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatusChanged {
    pub session: SessionId,
    pub new_status: SessionStatus,
}
