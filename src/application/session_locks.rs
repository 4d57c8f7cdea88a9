//! Per-conversation serialization.
//!
//! One async mutex per (user, bot) pair, held for a whole orchestrator pass
//! so two messages of the same conversation never interleave their
//! read-modify-write of session state. Keying by pair rather than session
//! id also covers the first message, before a session exists. Different
//! pairs never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::SessionKey;

#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to a conversation. Released on drop.
    pub async fn acquire(&self, key: &SessionKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(key.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops locks nobody holds or waits on. Returns how many were removed.
    pub async fn prune(&self) -> usize {
        let mut locks = self.locks.lock().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
