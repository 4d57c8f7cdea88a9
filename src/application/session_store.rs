//! SessionStore - conversation session lifecycle.
//!
//! Builds create/lookup/expire/end on top of a [`SessionRepository`]. Expiry
//! is lazy: a session past `expires_at` is ended (and persisted as ended)
//! the next time anyone looks it up. The sweeper does the same thing in the
//! background.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::foundation::{BotId, SessionId, Timestamp, UserAddress};
use crate::domain::session::{ConversationSession, EndReason};
use crate::ports::{GetOrCreate, SessionRepository, SessionStoreError};

pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Returns the pair's active session, creating one if none is live.
    ///
    /// Idempotent under concurrent calls: the repository's insert-if-absent
    /// makes both callers converge on one session. A reused session has its
    /// expiry extended.
    pub async fn get_or_create(
        &self,
        user_id: UserAddress,
        bot_id: BotId,
        sub_domain: &str,
        ttl_hours: i64,
    ) -> Result<ConversationSession, SessionStoreError> {
        let now = Timestamp::now();
        let candidate = ConversationSession::new(user_id, bot_id, sub_domain, ttl_hours, now);

        match self.repository.insert_if_absent(candidate, &now).await? {
            GetOrCreate::Created(session) => {
                info!(
                    session_id = %session.id(),
                    key = %session.key(),
                    "Conversation session created"
                );
                Ok(session)
            }
            GetOrCreate::Existing(mut session) => {
                session.touch(now);
                self.repository.update(&session).await?;
                Ok(session)
            }
        }
    }

    /// Loads a session by id, in any status.
    ///
    /// # Errors
    ///
    /// `NotFound` only when the id was never stored; ended and expired
    /// sessions are returned with status `Ended`.
    pub async fn get(&self, id: &SessionId) -> Result<ConversationSession, SessionStoreError> {
        let mut session = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(SessionStoreError::NotFound(*id))?;

        if session.expire_if_due(&Timestamp::now()) {
            debug!(session_id = %id, "Session expired on lookup");
            self.repository.update(&session).await?;
        }
        Ok(session)
    }

    /// Persists a session, refreshing its activity time and expiry.
    pub async fn save(&self, session: &mut ConversationSession) -> Result<(), SessionStoreError> {
        session.touch(Timestamp::now());
        self.repository.update(session).await
    }

    /// Active, unexpired sessions of a bot, most recent first.
    pub async fn list_active(
        &self,
        bot_id: &BotId,
        limit: usize,
    ) -> Result<Vec<ConversationSession>, SessionStoreError> {
        let now = Timestamp::now();
        let mut sessions = self.repository.list_active_by_bot(bot_id, limit).await?;
        sessions.retain(|s| !s.is_expired(&now));
        Ok(sessions)
    }

    /// Ends a session. Ending an ended session is a no-op that keeps the
    /// original reason.
    pub async fn end(
        &self,
        id: &SessionId,
        reason: EndReason,
    ) -> Result<ConversationSession, SessionStoreError> {
        let mut session = self.get(id).await?;
        if session.end(reason) {
            self.repository.update(&session).await?;
            info!(session_id = %id, reason = ?reason, "Conversation session ended");
        }
        Ok(session)
    }

    /// Sessions still marked active whose expiry has passed.
    pub async fn list_expired(&self) -> Result<Vec<ConversationSession>, SessionStoreError> {
        self.repository.list_expired(&Timestamp::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionRepository;
    use crate::domain::session::{Intent, SessionStatus, Step, DEFAULT_TTL_HOURS};

    fn user() -> UserAddress {
        UserAddress::new("+51999").unwrap()
    }

    fn bot() -> BotId {
        BotId::new("B1").unwrap()
    }

    fn store() -> (SessionStore, Arc<InMemorySessionRepository>) {
        let repo = Arc::new(InMemorySessionRepository::new());
        (SessionStore::new(repo.clone()), repo)
    }

    /// Stores a session whose last activity was `hours_ago` hours back.
    async fn stale_session(repo: &InMemorySessionRepository, hours_ago: i64) -> ConversationSession {
        let at = Timestamp::now().minus_hours(hours_ago);
        let session = ConversationSession::new(user(), bot(), "shop", DEFAULT_TTL_HOURS, at);
        repo.insert_if_absent(session, &at).await.unwrap().into_session()
    }

    mod get_or_create {
        use super::*;

        #[tokio::test]
        async fn reuses_the_active_session() {
            let (store, repo) = store();
            let first = store.get_or_create(user(), bot(), "shop", 24).await.unwrap();
            let second = store.get_or_create(user(), bot(), "shop", 24).await.unwrap();

            assert_eq!(first.id(), second.id());
            assert!(second.expires_at() >= first.expires_at());
            assert_eq!(repo.session_count().await, 1);
        }

        #[tokio::test]
        async fn concurrent_calls_converge() {
            let (store, repo) = store();
            let store = Arc::new(store);

            let a = {
                let store = store.clone();
                tokio::spawn(async move { store.get_or_create(user(), bot(), "shop", 24).await })
            };
            let b = {
                let store = store.clone();
                tokio::spawn(async move { store.get_or_create(user(), bot(), "shop", 24).await })
            };

            let a = a.await.unwrap().unwrap();
            let b = b.await.unwrap().unwrap();
            assert_eq!(a.id(), b.id());
            assert_eq!(repo.session_count().await, 1);
        }

        #[tokio::test]
        async fn replaces_an_expired_session() {
            let (store, repo) = store();
            let stale = stale_session(&repo, 25).await;

            let fresh = store.get_or_create(user(), bot(), "shop", 24).await.unwrap();

            assert_ne!(stale.id(), fresh.id());
            assert!(fresh.is_active());
        }
    }

    mod lookup {
        use super::*;

        #[tokio::test]
        async fn unknown_id_is_not_found() {
            let (store, _) = store();
            let id = SessionId::new();
            assert_eq!(store.get(&id).await, Err(SessionStoreError::NotFound(id)));
        }

        #[tokio::test]
        async fn stale_session_is_reported_ended() {
            let (store, repo) = store();
            let stale = stale_session(&repo, 25).await;

            let loaded = store.get(stale.id()).await.unwrap();
            assert_eq!(loaded.status(), SessionStatus::Ended);
            assert_eq!(loaded.end_reason(), Some(EndReason::Expired));

            let persisted = repo.find_by_id(stale.id()).await.unwrap().unwrap();
            assert_eq!(persisted.status(), SessionStatus::Ended);
        }

        #[tokio::test]
        async fn recent_session_stays_active() {
            let (store, repo) = store();
            let recent = stale_session(&repo, 23).await;
            assert!(store.get(recent.id()).await.unwrap().is_active());
        }

        #[tokio::test]
        async fn list_active_skips_expired_sessions() {
            let (store, repo) = store();
            stale_session(&repo, 30).await;
            let other = ConversationSession::new(
                UserAddress::new("+51888").unwrap(),
                bot(),
                "shop",
                DEFAULT_TTL_HOURS,
                Timestamp::now(),
            );
            repo.insert_if_absent(other, &Timestamp::now()).await.unwrap();

            let active = store.list_active(&bot(), 10).await.unwrap();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].user_id().as_str(), "+51888");
        }
    }

    mod save_and_end {
        use super::*;

        #[tokio::test]
        async fn save_persists_and_refreshes_activity() {
            let (store, repo) = store();
            let mut session = stale_session(&repo, 2).await;
            let before = *session.last_activity_at();
            session.transition(Intent::Menu, Step::Browsing).unwrap();

            store.save(&mut session).await.unwrap();

            assert!(session.last_activity_at() > &before);
            let persisted = repo.find_by_id(session.id()).await.unwrap().unwrap();
            assert_eq!(persisted.current_intent(), Intent::Menu);
        }

        #[tokio::test]
        async fn end_is_idempotent() {
            let (store, _) = store();
            let session = store.get_or_create(user(), bot(), "shop", 24).await.unwrap();

            let first = store.end(session.id(), EndReason::Closed).await.unwrap();
            let second = store.end(session.id(), EndReason::Cancelled).await.unwrap();

            assert_eq!(first.status(), SessionStatus::Ended);
            assert_eq!(second.end_reason(), Some(EndReason::Closed));
        }

        #[tokio::test]
        async fn ended_session_is_not_reused() {
            let (store, _) = store();
            let session = store.get_or_create(user(), bot(), "shop", 24).await.unwrap();
            store.end(session.id(), EndReason::Closed).await.unwrap();

            let next = store.get_or_create(user(), bot(), "shop", 24).await.unwrap();
            assert_ne!(next.id(), session.id());
        }
    }
}
