//! SessionSweeper - background expiry of idle conversations.
//!
//! Lazy expiry already ends a stale session the moment anyone looks it up;
//! the sweeper makes sure sessions nobody looks at again are ended too, and
//! drops per-conversation locks that are no longer in use.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 300s | Time between sweeps |
//!
//! ## Graceful Shutdown
//!
//! The sweeper listens on a `watch` channel and runs one last sweep before
//! stopping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::application::{SessionLocks, SessionStore};
use crate::ports::SessionStoreError;

#[derive(Debug, Clone)]
pub struct SessionSweeperConfig {
    pub interval: Duration,
}

impl Default for SessionSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

impl SessionSweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// What one sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub expired: usize,
    pub pruned_locks: usize,
}

pub struct SessionSweeper {
    sessions: Arc<SessionStore>,
    locks: SessionLocks,
    config: SessionSweeperConfig,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<SessionStore>, locks: SessionLocks) -> Self {
        Self::with_config(sessions, locks, SessionSweeperConfig::default())
    }

    pub fn with_config(
        sessions: Arc<SessionStore>,
        locks: SessionLocks,
        config: SessionSweeperConfig,
    ) -> Self {
        Self {
            sessions,
            locks,
            config,
        }
    }

    /// Runs until the shutdown channel flips to `true`. Sweep failures are
    /// logged and retried on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.sweep_logged().await;
                        info!("Session sweeper stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.sweep_logged().await;
                }
            }
        }
    }

    /// One sweep: ends every expired session and prunes idle locks.
    pub async fn sweep_once(&self) -> Result<SweepReport, SessionStoreError> {
        let mut report = SweepReport::default();

        for candidate in self.sessions.list_expired().await? {
            let _guard = self.locks.acquire(&candidate.key()).await;
            // The lookup ends and persists the session if it is still due.
            let session = self.sessions.get(candidate.id()).await?;
            if !session.is_active() && candidate.is_active() {
                report.expired += 1;
            }
        }
        report.pruned_locks = self.locks.prune().await;
        Ok(report)
    }

    async fn sweep_logged(&self) {
        match self.sweep_once().await {
            Ok(report) if report.expired > 0 => {
                info!(expired = report.expired, pruned_locks = report.pruned_locks, "Sessions swept");
            }
            Ok(report) => debug!(pruned_locks = report.pruned_locks, "Nothing to sweep"),
            Err(e) => warn!(error = %e, "Session sweep failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionRepository;
    use crate::domain::foundation::{BotId, SessionKey, Timestamp, UserAddress};
    use crate::domain::session::{ConversationSession, EndReason, DEFAULT_TTL_HOURS};
    use crate::ports::SessionRepository;

    async fn seed(repo: &InMemorySessionRepository, user: &str, hours_ago: i64) -> ConversationSession {
        let at = Timestamp::now().minus_hours(hours_ago);
        let session = ConversationSession::new(
            UserAddress::new(user).unwrap(),
            BotId::new("B1").unwrap(),
            "shop",
            DEFAULT_TTL_HOURS,
            at,
        );
        repo.insert_if_absent(session, &at).await.unwrap().into_session()
    }

    #[tokio::test]
    async fn ends_expired_sessions_only() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let stale = seed(&repo, "+1", 30).await;
        let fresh = seed(&repo, "+2", 1).await;
        let sweeper = SessionSweeper::new(Arc::new(SessionStore::new(repo.clone())), SessionLocks::new());

        let report = sweeper.sweep_once().await.unwrap();

        assert_eq!(report.expired, 1);
        let stale = repo.find_by_id(stale.id()).await.unwrap().unwrap();
        assert_eq!(stale.end_reason(), Some(EndReason::Expired));
        assert!(repo.find_by_id(fresh.id()).await.unwrap().unwrap().is_active());

        assert_eq!(sweeper.sweep_once().await.unwrap().expired, 0);
    }

    #[tokio::test]
    async fn prunes_idle_locks() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let locks = SessionLocks::new();
        let key = SessionKey::new(UserAddress::new("+1").unwrap(), BotId::new("B1").unwrap());
        drop(locks.acquire(&key).await);

        let sweeper = SessionSweeper::new(Arc::new(SessionStore::new(repo)), locks.clone());
        let report = sweeper.sweep_once().await.unwrap();

        assert_eq!(report.pruned_locks, 1);
        assert!(locks.is_empty().await);
    }

    #[tokio::test]
    async fn stops_on_shutdown_after_a_final_sweep() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let stale = seed(&repo, "+1", 30).await;
        let sweeper = SessionSweeper::with_config(
            Arc::new(SessionStore::new(repo.clone())),
            SessionLocks::new(),
            SessionSweeperConfig::default().with_interval(Duration::from_secs(3600)),
        );
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(async move { sweeper.run(rx).await });
        tx.send(true).unwrap();
        time::timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

        let stale = repo.find_by_id(stale.id()).await.unwrap().unwrap();
        assert!(!stale.is_active());
    }
}
