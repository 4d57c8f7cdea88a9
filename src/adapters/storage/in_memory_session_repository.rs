//! In-Memory Session Repository
//!
//! Keeps sessions in a map guarded by one `RwLock`. `insert_if_absent` does
//! its check and insert under a single write guard, which makes it atomic
//! per (user, bot) pair. Useful for tests and the console driver.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{BotId, SessionId, SessionKey, Timestamp};
use crate::domain::session::ConversationSession;
use crate::ports::{GetOrCreate, SessionRepository, SessionStoreError};

#[derive(Debug, Default)]
struct Tables {
    sessions: HashMap<SessionId, ConversationSession>,
    /// Active session per pair.
    active: HashMap<SessionKey, SessionId>,
}

/// In-memory storage for conversation sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions in any status.
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.sessions.clear();
        tables.active.clear();
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert_if_absent(
        &self,
        candidate: ConversationSession,
        now: &Timestamp,
    ) -> Result<GetOrCreate, SessionStoreError> {
        let mut tables = self.tables.write().await;
        let key = candidate.key();

        if let Some(existing_id) = tables.active.get(&key).copied() {
            if let Some(existing) = tables.sessions.get_mut(&existing_id) {
                if existing.is_active() && !existing.expire_if_due(now) {
                    return Ok(GetOrCreate::Existing(existing.clone()));
                }
            }
            tables.active.remove(&key);
        }

        tables.active.insert(key, *candidate.id());
        tables.sessions.insert(*candidate.id(), candidate.clone());
        Ok(GetOrCreate::Created(candidate))
    }

    async fn find_by_id(
        &self,
        id: &SessionId,
    ) -> Result<Option<ConversationSession>, SessionStoreError> {
        Ok(self.tables.read().await.sessions.get(id).cloned())
    }

    async fn find_active_by_key(
        &self,
        key: &SessionKey,
    ) -> Result<Option<ConversationSession>, SessionStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .active
            .get(key)
            .and_then(|id| tables.sessions.get(id))
            .filter(|s| s.is_active())
            .cloned())
    }

    async fn update(&self, session: &ConversationSession) -> Result<(), SessionStoreError> {
        let mut tables = self.tables.write().await;
        if !tables.sessions.contains_key(session.id()) {
            return Err(SessionStoreError::NotFound(*session.id()));
        }
        let key = session.key();
        if session.is_active() {
            tables.active.insert(key, *session.id());
        } else if tables.active.get(&key) == Some(session.id()) {
            tables.active.remove(&key);
        }
        tables.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn list_active_by_bot(
        &self,
        bot_id: &BotId,
        limit: usize,
    ) -> Result<Vec<ConversationSession>, SessionStoreError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<ConversationSession> = tables
            .sessions
            .values()
            .filter(|s| s.is_active() && s.bot_id() == bot_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_activity_at().cmp(a.last_activity_at()));
        sessions.truncate(limit);
        Ok(sessions)
    }

    async fn list_expired(
        &self,
        now: &Timestamp,
    ) -> Result<Vec<ConversationSession>, SessionStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .values()
            .filter(|s| s.is_expired(now))
            .cloned()
            .collect())
    }
}
