//! Modifier option pricing and menu entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{format_amount, ModifierId, Money, OptionId, ProductId};
use crate::domain::order::ModifierLine;

use super::presentation::{resolve_presentation_price, Presentation};
use super::PricingError;

/// A selectable choice within a modifier category, as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierOption {
    pub name: String,
    pub price: Money,
    pub active: bool,
}

/// Prices one modifier selection into a cart line entry.
///
/// # Errors
///
/// - `InactiveOption` if the catalog has switched the option off
/// - `InvalidModifierQuantity` for a zero quantity
/// - `NegativePrice` if the catalog price is below zero
pub fn price_modifier(
    modifier_id: ModifierId,
    option_id: OptionId,
    option: &ModifierOption,
    quantity: u32,
) -> Result<ModifierLine, PricingError> {
    if !option.active {
        return Err(PricingError::InactiveOption {
            option: format!("{}:{}", modifier_id, option_id),
        });
    }
    if quantity < 1 {
        return Err(PricingError::InvalidModifierQuantity {
            modifier: modifier_id.to_string(),
            quantity,
        });
    }
    if option.price < Money::ZERO {
        return Err(PricingError::NegativePrice {
            field: format!("modifier {}", modifier_id),
        });
    }
    Ok(ModifierLine {
        modifier_id,
        option_id,
        name: option.name.clone(),
        unit_price: option.price,
        quantity,
    })
}

/// One orderable line of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub product_id: ProductId,
    pub presentation: Presentation,
}

impl MenuEntry {
    /// Price after discount.
    pub fn unit_price(&self) -> Money {
        resolve_presentation_price(&self.presentation)
    }

    /// Item reference a user types to order this entry, e.g. `P1/grande`.
    pub fn reference(&self) -> String {
        match &self.presentation.id {
            Some(id) => format!("{}/{}", self.product_id, id),
            None => self.product_id.to_string(),
        }
    }

    /// Menu line for chat, e.g. `P1/grande - Pizza Grande: S/ 30.00`.
    pub fn describe(&self, currency_symbol: &str) -> String {
        let price = format_amount(currency_symbol, self.unit_price());
        let discounted = if self.unit_price() < self.presentation.price {
            format!(" (antes {})", format_amount(currency_symbol, self.presentation.price))
        } else {
            String::new()
        };
        format!(
            "{} - {} {}: {}{}",
            self.reference(),
            self.presentation.product_name,
            self.presentation.name,
            price,
            discounted
        )
    }
}
