//! GetSessionHandler - Query handler for a conversation session.

use std::sync::Arc;
use thiserror::Error;

use crate::application::SessionStore;
use crate::domain::foundation::SessionId;
use crate::domain::session::ConversationSession;
use crate::ports::SessionStoreError;

#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// `NotFound` means the id never existed. An ended or expired session is
/// returned normally with status `Ended`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetSessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session storage failure: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for GetSessionError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => GetSessionError::NotFound(id),
            SessionStoreError::Storage(reason) => GetSessionError::Storage(reason),
        }
    }
}

pub struct GetSessionHandler {
    sessions: Arc<SessionStore>,
}

impl GetSessionHandler {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<ConversationSession, GetSessionError> {
        Ok(self.sessions.get(&query.session_id).await?)
    }
}
