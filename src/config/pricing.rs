//! Pricing configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Fraction of the subtotal charged as tax, between 0 and 1
    #[serde(default)]
    pub tax_rate: Decimal,

    /// Flat fee for delivered orders
    #[serde(default)]
    pub delivery_fee: Decimal,

    /// Symbol used when rendering amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Largest quantity accepted on one line
    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: u32,
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(ValidationError::InvalidTaxRate);
        }
        if self.delivery_fee < Decimal::ZERO {
            return Err(ValidationError::NegativeDeliveryFee);
        }
        if self.max_item_quantity == 0 {
            return Err(ValidationError::InvalidQuantityBound);
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            currency_symbol: default_currency_symbol(),
            max_item_quantity: default_max_item_quantity(),
        }
    }
}

fn default_currency_symbol() -> String {
    "S/".to_string()
}

fn default_max_item_quantity() -> u32 {
    99
}
