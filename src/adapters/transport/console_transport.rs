//! Console transport: prints replies to stdout for the local driver.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::foundation::UserAddress;
use crate::ports::{DeliveryAck, MessageTransport, TransportError};

#[derive(Debug, Clone, Default)]
pub struct ConsoleTransport {
    sent: Arc<AtomicU64>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageTransport for ConsoleTransport {
    async fn send_text(
        &self,
        user_id: &UserAddress,
        text: &str,
    ) -> Result<DeliveryAck, TransportError> {
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[bot -> {}]\n{}\n", user_id, text);
        Ok(DeliveryAck {
            message_id: format!("console-{}", n),
        })
    }
}
