//! Line item arithmetic.

use crate::domain::foundation::Money;
use crate::domain::order::ModifierLine;

use super::PricingError;

/// Computes `unit_price * quantity + Σ(modifier.unit_price * modifier.quantity)`.
///
/// # Errors
///
/// - `InvalidQuantity` if `quantity < 1`
/// - `InvalidModifierQuantity` if a modifier quantity is below 1
/// - `NegativePrice` if any unit price is negative
/// - `Overflow` if the total does not fit in [`Money`]
pub fn compute_line_total(
    unit_price: Money,
    quantity: u32,
    modifiers: &[ModifierLine],
) -> Result<Money, PricingError> {
    if quantity < 1 {
        return Err(PricingError::InvalidQuantity { quantity });
    }
    if unit_price < Money::ZERO {
        return Err(PricingError::NegativePrice {
            field: "unit_price".to_string(),
        });
    }

    let mut total = checked_product(unit_price, quantity, "unit_price")?;
    for modifier in modifiers {
        if modifier.quantity < 1 {
            return Err(PricingError::InvalidModifierQuantity {
                modifier: modifier.modifier_id.to_string(),
                quantity: modifier.quantity,
            });
        }
        if modifier.unit_price < Money::ZERO {
            return Err(PricingError::NegativePrice {
                field: format!("modifier {}", modifier.modifier_id),
            });
        }
        let field = format!("modifier {}", modifier.modifier_id);
        let extra = checked_product(modifier.unit_price, modifier.quantity, &field)?;
        total = total
            .checked_add(extra)
            .ok_or(PricingError::Overflow { field })?;
    }
    Ok(total)
}

fn checked_product(price: Money, quantity: u32, field: &str) -> Result<Money, PricingError> {
    price
        .checked_mul(Money::from(quantity))
        .ok_or_else(|| PricingError::Overflow {
            field: field.to_string(),
        })
}
