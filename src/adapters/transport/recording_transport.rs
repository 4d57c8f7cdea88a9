//! Recording transport for tests.
//!
//! Keeps every delivered message for later assertions and can be switched
//! to fail, so callers can check that a lost reply does not lose state.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::UserAddress;
use crate::ports::{DeliveryAck, MessageTransport, TransportError};

/// One delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub user_id: UserAddress,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn last_text(&self) -> Option<String> {
        self.sent.lock().await.last().map(|m| m.text.clone())
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send_text(
        &self,
        user_id: &UserAddress,
        text: &str,
    ) -> Result<DeliveryAck, TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Failed("recording transport switched off".to_string()));
        }
        let mut sent = self.sent.lock().await;
        sent.push(SentMessage {
            user_id: user_id.clone(),
            text: text.to_string(),
        });
        Ok(DeliveryAck {
            message_id: format!("rec-{}", sent.len()),
        })
    }
}
