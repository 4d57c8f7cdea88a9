//! Order store port.
//!
//! Orders are owned by the store once created; the conversation only
//! creates them, appends to open ones and reads them back.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::OrderId;
use crate::domain::order::{Order, OrderLineItem};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Order {0} no longer accepts items")]
    Closed(OrderId),

    #[error("Order store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Stores a new order and returns its id.
    async fn create_order(&self, order: &Order) -> Result<OrderId, OrderStoreError>;

    /// Appends lines to a stored order in one write; the store recomputes
    /// its totals. Either every line is stored or none is.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown ids
    /// - `Closed` when the order is no longer pending
    async fn append_items(
        &self,
        order_id: &OrderId,
        items: &[OrderLineItem],
    ) -> Result<(), OrderStoreError>;

    async fn get_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn OrderStore) {}
    }
}
