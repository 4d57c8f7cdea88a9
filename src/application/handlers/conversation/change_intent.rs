//! ChangeIntentHandler - moves a session to another intent from outside
//! the chat (e.g. an operator taking over).

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::application::{SessionLocks, SessionStore};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::{ConversationSession, Intent, Step};
use crate::ports::SessionStoreError;

/// Without `step` the intent's entry step is used.
#[derive(Debug, Clone)]
pub struct ChangeIntentCommand {
    pub session_id: SessionId,
    pub intent: Intent,
    pub step: Option<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeIntentError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session {0} has ended")]
    Ended(SessionId),

    #[error("Step '{step}' does not belong to intent '{intent}'")]
    InvalidStep { intent: Intent, step: Step },

    #[error("Session storage failure: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for ChangeIntentError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => ChangeIntentError::NotFound(id),
            SessionStoreError::Storage(reason) => ChangeIntentError::Storage(reason),
        }
    }
}

pub struct ChangeIntentHandler {
    sessions: Arc<SessionStore>,
    locks: SessionLocks,
}

impl ChangeIntentHandler {
    pub fn new(sessions: Arc<SessionStore>, locks: SessionLocks) -> Self {
        Self { sessions, locks }
    }

    pub async fn handle(
        &self,
        cmd: ChangeIntentCommand,
    ) -> Result<ConversationSession, ChangeIntentError> {
        let key = self.sessions.get(&cmd.session_id).await?.key();
        let _guard = self.locks.acquire(&key).await;

        // Reload under the lock; a turn may have run in between.
        let mut session = self.sessions.get(&cmd.session_id).await?;
        let step = cmd.step.unwrap_or_else(|| cmd.intent.entry_step());
        session
            .transition(cmd.intent, step)
            .map_err(|e| map_transition_error(e, &cmd.session_id, cmd.intent, step))?;
        self.sessions.save(&mut session).await?;

        info!(
            session_id = %cmd.session_id,
            intent = %cmd.intent,
            step = %step,
            "Intent changed"
        );
        Ok(session)
    }
}

fn map_transition_error(
    err: DomainError,
    session_id: &SessionId,
    intent: Intent,
    step: Step,
) -> ChangeIntentError {
    match err.code {
        ErrorCode::SessionEnded => ChangeIntentError::Ended(*session_id),
        ErrorCode::InvalidStateTransition => ChangeIntentError::InvalidStep { intent, step },
        _ => ChangeIntentError::Storage(err.message),
    }
}
