//! ListActiveSessionsHandler - Query handler for a bot's live conversations.

use std::sync::Arc;

use crate::application::SessionStore;
use crate::domain::foundation::BotId;
use crate::domain::session::ConversationSession;
use crate::ports::SessionStoreError;

#[derive(Debug, Clone)]
pub struct ListActiveSessionsQuery {
    pub bot_id: BotId,
    pub limit: usize,
}

pub struct ListActiveSessionsHandler {
    sessions: Arc<SessionStore>,
}

impl ListActiveSessionsHandler {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Most recently active first.
    pub async fn handle(
        &self,
        query: ListActiveSessionsQuery,
    ) -> Result<Vec<ConversationSession>, SessionStoreError> {
        self.sessions.list_active(&query.bot_id, query.limit).await
    }
}
