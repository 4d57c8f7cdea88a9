//! Session repository port.
//!
//! Durable backend for conversation sessions, keyed by session id and by
//! the (user, bot) pair. The application-level `SessionStore` builds the
//! session lifecycle on top of it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{BotId, SessionId, SessionKey, Timestamp};
use crate::domain::session::ConversationSession;

/// Errors raised by session persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session storage failure: {0}")]
    Storage(String),
}

/// Result of [`SessionRepository::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOrCreate {
    /// An active session already existed for the pair.
    Existing(ConversationSession),
    /// The candidate was stored.
    Created(ConversationSession),
}

impl GetOrCreate {
    pub fn was_created(&self) -> bool {
        matches!(self, GetOrCreate::Created(_))
    }

    pub fn session(&self) -> &ConversationSession {
        match self {
            GetOrCreate::Existing(s) | GetOrCreate::Created(s) => s,
        }
    }

    pub fn into_session(self) -> ConversationSession {
        match self {
            GetOrCreate::Existing(s) | GetOrCreate::Created(s) => s,
        }
    }
}

/// Repository port for conversation sessions.
///
/// Implementations must keep at most one active session per (user, bot)
/// pair.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Atomically returns the pair's active, unexpired session or stores
    /// `candidate`.
    ///
    /// A session that is still marked active but has expired at `now` is
    /// ended with reason `Expired` (and persisted that way) before the
    /// candidate takes its place. Two concurrent calls for the same pair
    /// converge on one stored session.
    async fn insert_if_absent(
        &self,
        candidate: ConversationSession,
        now: &Timestamp,
    ) -> Result<GetOrCreate, SessionStoreError>;

    /// Find a session by id, in any status.
    async fn find_by_id(&self, id: &SessionId)
        -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Find the active session of a (user, bot) pair, expired or not.
    async fn find_active_by_key(
        &self,
        key: &SessionKey,
    ) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Replace a stored session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session was never stored
    async fn update(&self, session: &ConversationSession) -> Result<(), SessionStoreError>;

    /// Active sessions of a bot, most recent activity first.
    async fn list_active_by_bot(
        &self,
        bot_id: &BotId,
        limit: usize,
    ) -> Result<Vec<ConversationSession>, SessionStoreError>;

    /// Sessions still marked active whose expiry is at or before `now`.
    async fn list_expired(
        &self,
        now: &Timestamp,
    ) -> Result<Vec<ConversationSession>, SessionStoreError>;
}
