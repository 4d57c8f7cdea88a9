//! OrderAssembler - turns a session's cart into a stored order.
//!
//! The session's open order (`current_order_id`) is reused while the store
//! still reports it pending; the cart lines are appended to it. Otherwise a
//! new order is built, priced and created. Either way the order returned is
//! the store's view after the write.
//!
//! The session itself is not touched here; the caller commits the returned
//! order to the session context only once the store has accepted it.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{Money, OrderId};
use crate::domain::order::{Order, OrderLineItem};
use crate::domain::session::ConversationSession;
use crate::ports::{OrderStore, OrderStoreError};

/// Store-wide pricing applied to new orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderPricing {
    /// Fraction of the subtotal, e.g. `0.18`.
    pub tax_rate: Money,
    /// Flat fee for orders that are brought to the customer.
    pub delivery_fee: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("The cart is empty")]
    EmptyCart,

    #[error("No payment method selected")]
    MissingPaymentMethod,

    #[error("Delivery details are incomplete")]
    MissingDeliveryInfo,

    #[error(transparent)]
    Store(#[from] OrderStoreError),
}

pub struct OrderAssembler {
    orders: Arc<dyn OrderStore>,
    pricing: OrderPricing,
}

impl OrderAssembler {
    pub fn new(orders: Arc<dyn OrderStore>, pricing: OrderPricing) -> Self {
        Self { orders, pricing }
    }

    /// Creates a new order or appends to the session's open one.
    pub async fn create_or_update(
        &self,
        session: &ConversationSession,
    ) -> Result<Order, AssemblyError> {
        let ctx = session.context();
        if ctx.order.is_empty() {
            return Err(AssemblyError::EmptyCart);
        }

        if let Some(open_id) = ctx.order.current_order_id {
            if let Some(order) = self.append_to_open(&open_id, &ctx.order.selected_items).await? {
                return Ok(order);
            }
        }

        let payment_method = ctx
            .payment
            .payment_method
            .ok_or(AssemblyError::MissingPaymentMethod)?;
        let delivery_info = ctx
            .delivery
            .delivery_info()
            .ok_or(AssemblyError::MissingDeliveryInfo)?;

        let mut order = Order::new(
            *session.id(),
            session.bot_id().clone(),
            session.user_id().clone(),
            payment_method,
            Some(delivery_info.clone()),
        );
        order.tax_rate = self.pricing.tax_rate;
        if delivery_info.delivery_type.charges_delivery_fee() {
            order.delivery_fee = self.pricing.delivery_fee;
        }
        let order = order.add_items(ctx.order.selected_items.iter().cloned());

        let id = self.orders.create_order(&order).await?;
        info!(
            session_id = %session.id(),
            order_id = %id,
            total = %order.total,
            "Order created"
        );
        self.stored(&id, order).await
    }

    /// Appends the cart to a pending order. `None` when the order is gone or
    /// closed and a fresh one has to be opened.
    async fn append_to_open(
        &self,
        order_id: &OrderId,
        items: &[OrderLineItem],
    ) -> Result<Option<Order>, AssemblyError> {
        let open = match self.orders.get_order(order_id).await? {
            Some(order) if order.is_open() => order,
            _ => {
                debug!(order_id = %order_id, "Open order no longer accepts items");
                return Ok(None);
            }
        };

        match self.orders.append_items(order_id, items).await {
            Ok(()) => {}
            // Closed between the read and the append.
            Err(OrderStoreError::Closed(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        info!(order_id = %order_id, appended = items.len(), "Items appended to open order");
        let expected = open.add_items(items.iter().cloned());
        self.stored(order_id, expected).await.map(Some)
    }

    /// Reads the order back; falls back to the locally priced copy if the
    /// store cannot return it.
    async fn stored(&self, id: &OrderId, mut local: Order) -> Result<Order, AssemblyError> {
        match self.orders.get_order(id).await? {
            Some(order) => Ok(order),
            None => {
                local.id = Some(*id);
                Ok(local)
            }
        }
    }
}
