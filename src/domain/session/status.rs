//! SessionStatus enum for tracking lifecycle of conversations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Ended,
}

impl SessionStatus {
    /// Returns true if the session can still be resumed by new messages.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl StateMachine for SessionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::Active => vec![SessionStatus::Ended],
            SessionStatus::Ended => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
        };
        write!(f, "{}", s)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The user typed an end/cancel keyword.
    Cancelled,
    /// A caller closed the conversation explicitly.
    Closed,
    /// The TTL passed without activity.
    Expired,
}
