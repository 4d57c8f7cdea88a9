//! Order aggregate.
//!
//! Orders are built from a session's cart by order assembly and owned by the
//! external order store afterwards. While `Pending` an order may still
//! receive items from the same conversation; any other status makes it
//! immutable history.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    BotId, Money, OrderId, SessionId, StateMachine, Timestamp, UserAddress,
};
use crate::domain::pricing::recompute_order_totals;

use super::{DeliveryInfo, OrderLineItem, PaymentMethod};

/// Lifecycle of an order once it leaves the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Only pending orders accept more items.
    pub fn accepts_items(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

impl StateMachine for OrderStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![Preparing, Cancelled],
            Preparing => vec![Delivered],
            Delivered => vec![],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A priced order.
///
/// # Invariants
///
/// - `subtotal = Σ item.total_price`
/// - `total = max(0, subtotal + tax + delivery_fee - discount)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the order store on creation.
    pub id: Option<OrderId>,
    /// Back-reference to the conversation that produced the order.
    pub conversation_id: SessionId,
    pub bot_id: BotId,
    pub user_id: UserAddress,
    pub items: Vec<OrderLineItem>,
    pub subtotal: Money,
    pub tax_rate: Money,
    pub tax: Money,
    pub delivery_fee: Money,
    pub discount: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_info: Option<DeliveryInfo>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Creates an empty pending order.
    pub fn new(
        conversation_id: SessionId,
        bot_id: BotId,
        user_id: UserAddress,
        payment_method: PaymentMethod,
        delivery_info: Option<DeliveryInfo>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: None,
            conversation_id,
            bot_id,
            user_id,
            items: Vec::new(),
            subtotal: Money::ZERO,
            tax_rate: Money::ZERO,
            tax: Money::ZERO,
            delivery_fee: Money::ZERO,
            discount: Money::ZERO,
            total: Money::ZERO,
            status: OrderStatus::Pending,
            payment_method,
            delivery_info,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends items and recomputes totals.
    pub fn add_items(self, items: impl IntoIterator<Item = OrderLineItem>) -> Self {
        let mut order = self;
        order.items.extend(items);
        order.updated_at = Timestamp::now();
        recompute_order_totals(order)
    }

    /// True while the conversation may still append to this order.
    pub fn is_open(&self) -> bool {
        self.status.accepts_items()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
