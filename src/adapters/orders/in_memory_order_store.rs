//! In-memory order store.
//!
//! Assigns ids on creation and recomputes totals on every append, the way a
//! real order service would. `set_status` stands in for the kitchen/back
//! office moving an order along.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::order::{Order, OrderLineItem, OrderStatus};
use crate::domain::pricing::recompute_order_totals;
use crate::ports::{OrderStore, OrderStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with `Unavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Overrides an order's status.
    pub async fn set_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), OrderStoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or(OrderStoreError::NotFound(*order_id))?;
        order.status = status;
        order.updated_at = Timestamp::now();
        Ok(())
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// All stored orders, oldest first.
    pub async fn all_orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        orders
    }

    fn check_available(&self) -> Result<(), OrderStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OrderStoreError::Unavailable(
                "in-memory order store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(&self, order: &Order) -> Result<OrderId, OrderStoreError> {
        self.check_available()?;
        let id = OrderId::new();
        let mut stored = recompute_order_totals(order.clone());
        stored.id = Some(id);
        self.orders.write().await.insert(id, stored);
        Ok(id)
    }

    async fn append_items(
        &self,
        order_id: &OrderId,
        items: &[OrderLineItem],
    ) -> Result<(), OrderStoreError> {
        self.check_available()?;
        let mut orders = self.orders.write().await;
        let order = orders
            .remove(order_id)
            .ok_or(OrderStoreError::NotFound(*order_id))?;
        if !order.is_open() {
            orders.insert(*order_id, order);
            return Err(OrderStoreError::Closed(*order_id));
        }
        orders.insert(*order_id, order.add_items(items.iter().cloned()));
        Ok(())
    }

    async fn get_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        self.check_available()?;
        Ok(self.orders.read().await.get(order_id).cloned())
    }
}
