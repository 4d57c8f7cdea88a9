//! Message transport port.
//!
//! Delivers reply text to the end user's chat. Retries and deduplication
//! belong to the transport; the conversation sends each reply once.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserAddress;

/// Acknowledgement returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAck {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Recipient unreachable: {0}")]
    Unreachable(String),

    #[error("Transport failure: {0}")]
    Failed(String),
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_text(&self, user_id: &UserAddress, text: &str)
        -> Result<DeliveryAck, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_transport_is_object_safe() {
        fn _accepts_dyn(_transport: &dyn MessageTransport) {}
    }
}
