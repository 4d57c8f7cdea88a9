//! Presentation pricing with optional discounts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, PresentationId};

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percentage of the base price.
    Percentage,
    /// `value` is subtracted from the base price.
    Fixed,
}

/// Discount configured on a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: Money,
}

impl Discount {
    pub fn percentage(value: Money) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            value,
        }
    }

    pub fn fixed(value: Money) -> Self {
        Self {
            kind: DiscountKind::Fixed,
            value,
        }
    }
}

/// A purchasable size/variant of a product as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: Option<PresentationId>,
    pub product_name: String,
    pub name: String,
    pub price: Money,
    pub discount: Option<Discount>,
}

/// Resolves the price a customer pays for one unit of a presentation.
///
/// Percentage discounts take `price * value / 100` off, fixed discounts take
/// `value` off. The result never goes below zero.
pub fn resolve_presentation_price(presentation: &Presentation) -> Money {
    let price = presentation.price;
    let amount = match presentation.discount {
        Some(Discount {
            kind: DiscountKind::Percentage,
            value,
        }) => price - price * value / Money::ONE_HUNDRED,
        Some(Discount {
            kind: DiscountKind::Fixed,
            value,
        }) => price - value,
        None => price,
    };
    amount.max(Money::ZERO)
}
