//! Message history entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who wrote a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Bot,
}

/// One entry of a session's message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    /// Time the orchestrator processed the message, not the transport time.
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Bot,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }
}
