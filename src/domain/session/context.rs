//! Typed conversation context.
//!
//! Each sub-flow owns one context struct and only receives a mutable
//! reference to that struct, so the address flow cannot touch the cart and
//! the support flow cannot touch payment. Data crosses between contexts only
//! through the explicit hand-off methods here (`OrderContext::commit`,
//! `DeliveryContext::delivery_info`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Money, OrderId};
use crate::domain::order::{
    DeliveryAddress, DeliveryInfo, DeliveryType, OrderLineItem, PaymentMethod, DEFAULT_COUNTRY,
};

/// All accumulated sub-flow and cart state of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub order: OrderContext,
    pub payment: PaymentContext,
    pub delivery: DeliveryContext,
    pub support: SupportContext,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart
// ─────────────────────────────────────────────────────────────────────────────

/// Cart lines not yet committed to an order, plus the open order reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderContext {
    pub selected_items: Vec<OrderLineItem>,
    /// Σ total_price of `selected_items`.
    pub order_total: Money,
    /// Open (pending) order that later purchases in this session append to.
    pub current_order_id: Option<OrderId>,
    /// Ids of orders created in this session, oldest first, bounded.
    pub order_history: Vec<OrderId>,
}

impl OrderContext {
    pub fn add_item(&mut self, item: OrderLineItem) {
        self.selected_items.push(item);
        self.recompute_total();
    }

    pub fn is_empty(&self) -> bool {
        self.selected_items.is_empty()
    }

    /// Moves the cart lines out, leaving an empty cart.
    pub fn take_items(&mut self) -> Vec<OrderLineItem> {
        let items = std::mem::take(&mut self.selected_items);
        self.recompute_total();
        items
    }

    /// Records the order the cart was committed to.
    ///
    /// New ids are appended to `order_history`, keeping at most
    /// `max_history` entries.
    pub fn commit(&mut self, order_id: OrderId, max_history: usize) {
        if self.current_order_id != Some(order_id) {
            self.order_history.push(order_id);
            if self.order_history.len() > max_history {
                let excess = self.order_history.len() - max_history;
                self.order_history.drain(..excess);
            }
        }
        self.current_order_id = Some(order_id);
    }

    fn recompute_total(&mut self) {
        self.order_total = self
            .selected_items
            .iter()
            .fold(Money::ZERO, |acc, i| acc.saturating_add(i.total_price));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentContext {
    pub payment_method: Option<PaymentMethod>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Delivery
// ─────────────────────────────────────────────────────────────────────────────

/// Progression of the address collection sub-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressStep {
    #[default]
    Street,
    City,
    District,
    PostalCode,
    Complete,
}

impl AddressStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressStep::Street => "street",
            AddressStep::City => "city",
            AddressStep::District => "district",
            AddressStep::PostalCode => "postal_code",
            AddressStep::Complete => "complete",
        }
    }
}

impl fmt::Display for AddressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Address fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub street: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressDraft {
    /// Builds the address; missing fields become empty strings so the
    /// caller's validation reports them.
    pub fn to_address(&self) -> DeliveryAddress {
        DeliveryAddress {
            street: self.street.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            district: self.district.clone().unwrap_or_default(),
            postal_code: self.postal_code.clone(),
            country: DEFAULT_COUNTRY.to_string(),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    pub delivery_type: Option<DeliveryType>,
    pub address_collection_step: AddressStep,
    pub draft: AddressDraft,
    pub delivery_address: Option<DeliveryAddress>,
    pub scheduled_for: Option<NaiveDate>,
}

impl DeliveryContext {
    /// Resets the address sub-flow to its first field.
    pub fn begin_address(&mut self) {
        self.address_collection_step = AddressStep::Street;
        self.draft = AddressDraft::default();
        self.delivery_address = None;
    }

    /// Delivery block for the order, if enough has been collected.
    pub fn delivery_info(&self) -> Option<DeliveryInfo> {
        match self.delivery_type.unwrap_or(DeliveryType::Delivery) {
            DeliveryType::Pickup => Some(DeliveryInfo::pickup()),
            kind => self
                .delivery_address
                .clone()
                .map(|address| DeliveryInfo::to_address(kind, address, self.scheduled_for)),
        }
    }

    /// Clears per-purchase delivery state once an order has been placed.
    pub fn reset_for_next_order(&mut self) {
        self.delivery_type = None;
        self.scheduled_for = None;
        self.draft = AddressDraft::default();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Support
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContext {
    pub support_issue: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    /// Summaries of tickets completed in this session.
    pub tickets: Vec<String>,
}

impl SupportContext {
    pub fn begin(&mut self) {
        self.support_issue = None;
        self.contact = None;
        self.email = None;
    }

    /// Keeps at most `max_tickets` summaries, dropping the oldest.
    pub fn record_ticket(&mut self, summary: String, max_tickets: usize) {
        self.tickets.push(summary);
        if self.tickets.len() > max_tickets {
            let excess = self.tickets.len() - max_tickets;
            self.tickets.drain(..excess);
        }
    }
}
