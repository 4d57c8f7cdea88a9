//! Pricing engine.
//!
//! Pure functions that price presentations, line items and orders. No state,
//! no I/O: callers resolve catalog data first and pass it in.

mod line_total;
mod modifier;
mod presentation;
mod totals;

pub use line_total::compute_line_total;
pub use modifier::{price_modifier, MenuEntry, ModifierOption};
pub use presentation::{resolve_presentation_price, Discount, DiscountKind, Presentation};
pub use totals::recompute_order_totals;

use thiserror::Error;

/// Errors raised by the pricing arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Quantity must be at least 1, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    #[error("Modifier {modifier} quantity must be at least 1, got {quantity}")]
    InvalidModifierQuantity { modifier: String, quantity: u32 },

    #[error("Option {option} is not available")]
    InactiveOption { option: String },

    #[error("Price for {field} cannot be negative")]
    NegativePrice { field: String },

    #[error("Line total for {field} is too large")]
    Overflow { field: String },
}
