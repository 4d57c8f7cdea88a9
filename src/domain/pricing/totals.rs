//! Order-level totals.

use crate::domain::foundation::{round_money, Money};
use crate::domain::order::Order;

/// Recomputes `subtotal`, `tax` and `total` from the order's items.
///
/// `tax = round(subtotal * tax_rate)` and
/// `total = max(0, subtotal + tax + delivery_fee - discount)`.
/// Pure and idempotent; call it after every change to `items`. Sums that
/// leave the [`Money`] range saturate.
pub fn recompute_order_totals(mut order: Order) -> Order {
    let subtotal = order
        .items
        .iter()
        .fold(Money::ZERO, |acc, item| acc.saturating_add(item.total_price));
    order.subtotal = subtotal;
    order.tax = round_money(subtotal.saturating_mul(order.tax_rate));
    order.total = subtotal
        .saturating_add(order.tax)
        .saturating_add(order.delivery_fee)
        .saturating_sub(order.discount)
        .max(Money::ZERO);
    order
}
