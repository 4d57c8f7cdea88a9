//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{format_amount, ModifierId, Money, OptionId, PresentationId, ProductId};
use crate::domain::pricing::{compute_line_total, PricingError};

/// One selected modifier option on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierLine {
    pub modifier_id: ModifierId,
    pub option_id: OptionId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

/// One cart entry: product, optional presentation, modifiers and quantity.
///
/// # Invariants
///
/// - `quantity >= 1`
/// - `total_price = unit_price * quantity + Σ(modifier.unit_price * modifier.quantity)`
/// - `total_price >= 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub presentation_id: Option<PresentationId>,
    pub quantity: u32,
    pub unit_price: Money,
    pub modifiers: Vec<ModifierLine>,
    pub total_price: Money,
}

impl OrderLineItem {
    /// Builds a priced line.
    ///
    /// # Errors
    ///
    /// Propagates `PricingError` for zero quantities or negative prices.
    pub fn new(
        product_id: ProductId,
        name: String,
        presentation_id: Option<PresentationId>,
        unit_price: Money,
        quantity: u32,
        modifiers: Vec<ModifierLine>,
    ) -> Result<Self, PricingError> {
        let total_price = compute_line_total(unit_price, quantity, &modifiers)?;
        Ok(Self {
            product_id,
            name,
            presentation_id,
            quantity,
            unit_price,
            modifiers,
            total_price,
        })
    }

    /// Renders the line for chat, e.g. `2 x Pizza Familiar (+ Extra queso) = S/ 31.00`.
    pub fn describe(&self, currency_symbol: &str) -> String {
        let mut text = format!("{} x {}", self.quantity, self.name);
        if !self.modifiers.is_empty() {
            let names: Vec<&str> = self.modifiers.iter().map(|m| m.name.as_str()).collect();
            text.push_str(&format!(" (+ {})", names.join(", ")));
        }
        text.push_str(&format!(" = {}", format_amount(currency_symbol, self.total_price)));
        text
    }
}
