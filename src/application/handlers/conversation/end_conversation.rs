//! EndConversationHandler - closes a conversation on request.
//!
//! Idempotent: ending an ended session succeeds and keeps its first reason.

use std::sync::Arc;
use thiserror::Error;

use crate::application::{SessionLocks, SessionStore};
use crate::domain::foundation::SessionId;
use crate::domain::session::EndReason;
use crate::ports::SessionStoreError;

#[derive(Debug, Clone)]
pub struct EndConversationCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndConversationError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session storage failure: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for EndConversationError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => EndConversationError::NotFound(id),
            SessionStoreError::Storage(reason) => EndConversationError::Storage(reason),
        }
    }
}

pub struct EndConversationHandler {
    sessions: Arc<SessionStore>,
    locks: SessionLocks,
}

impl EndConversationHandler {
    pub fn new(sessions: Arc<SessionStore>, locks: SessionLocks) -> Self {
        Self { sessions, locks }
    }

    pub async fn handle(&self, cmd: EndConversationCommand) -> Result<(), EndConversationError> {
        let key = self.sessions.get(&cmd.session_id).await?.key();
        let _guard = self.locks.acquire(&key).await;
        self.sessions.end(&cmd.session_id, EndReason::Closed).await?;
        Ok(())
    }
}
