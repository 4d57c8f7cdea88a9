//! Delivery mode, address and the delivery block attached to an order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{contains_phrase, ValidationError};

/// Minimum lengths (exclusive) for required address fields.
pub const MIN_STREET_LEN: usize = 5;
pub const MIN_CITY_LEN: usize = 2;
pub const MIN_DISTRICT_LEN: usize = 2;

/// Default country for addresses collected in chat.
pub const DEFAULT_COUNTRY: &str = "Peru";

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Delivery,
    Pickup,
    ScheduledDelivery,
}

impl DeliveryType {
    /// All modes in menu order (1-based numbering).
    pub const ALL: [DeliveryType; 3] = [
        DeliveryType::Delivery,
        DeliveryType::Pickup,
        DeliveryType::ScheduledDelivery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivery => "Delivery a domicilio",
            Self::Pickup => "Recojo en tienda",
            Self::ScheduledDelivery => "Delivery programado",
        }
    }

    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Delivery => &["delivery", "domicilio", "envio", "a casa"],
            Self::Pickup => &["recojo", "recoger", "pickup", "retiro", "en tienda"],
            Self::ScheduledDelivery => &["programado", "programar", "scheduled", "agendar"],
        }
    }

    /// Maps `"1"`..`"3"` or a synonym to a mode. Scheduled is checked first
    /// so "delivery programado" does not resolve to plain delivery.
    pub fn from_token(normalized: &str) -> Option<Self> {
        let token = normalized.trim();
        if let Ok(n) = token.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        [Self::ScheduledDelivery, Self::Pickup, Self::Delivery]
            .into_iter()
            .find(|mode| mode.synonyms().iter().any(|s| contains_phrase(token, s)))
    }

    /// True when an address must be collected.
    pub fn requires_address(&self) -> bool {
        !matches!(self, Self::Pickup)
    }

    /// True when the delivery fee applies.
    pub fn charges_delivery_fee(&self) -> bool {
        self.requires_address()
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Postal address collected field by field in chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub district: String,
    pub postal_code: Option<String>,
    pub country: String,
    pub notes: Option<String>,
}

impl DeliveryAddress {
    /// Checks the completeness rule: street longer than 5 characters,
    /// city and district longer than 2.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_len("street", &self.street, MIN_STREET_LEN)?;
        check_len("city", &self.city, MIN_CITY_LEN)?;
        check_len("district", &self.district, MIN_DISTRICT_LEN)?;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// One-line rendering for summaries.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.street.clone(), self.district.clone(), self.city.clone()];
        if let Some(code) = &self.postal_code {
            parts.push(code.clone());
        }
        parts.push(self.country.clone());
        parts.join(", ")
    }
}

fn check_len(field: &str, value: &str, min_exclusive: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::empty_field(field));
    }
    if len <= min_exclusive {
        return Err(ValidationError::invalid_format(
            field,
            format!("must be longer than {} characters", min_exclusive),
        ));
    }
    Ok(())
}

/// Delivery block stored on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub delivery_type: DeliveryType,
    pub address: Option<DeliveryAddress>,
    pub scheduled_for: Option<NaiveDate>,
}

impl DeliveryInfo {
    pub fn pickup() -> Self {
        Self {
            delivery_type: DeliveryType::Pickup,
            address: None,
            scheduled_for: None,
        }
    }

    pub fn to_address(
        delivery_type: DeliveryType,
        address: DeliveryAddress,
        scheduled_for: Option<NaiveDate>,
    ) -> Self {
        Self {
            delivery_type,
            address: Some(address),
            scheduled_for,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(street: &str, city: &str, district: &str) -> DeliveryAddress {
        DeliveryAddress {
            street: street.to_string(),
            city: city.to_string(),
            district: district.to_string(),
            postal_code: None,
            country: DEFAULT_COUNTRY.to_string(),
            notes: None,
        }
    }

    mod delivery_type {
        use super::*;

        #[test]
        fn numbers_map_to_modes() {
            assert_eq!(DeliveryType::from_token("1"), Some(DeliveryType::Delivery));
            assert_eq!(DeliveryType::from_token("2"), Some(DeliveryType::Pickup));
            assert_eq!(DeliveryType::from_token("3"), Some(DeliveryType::ScheduledDelivery));
            assert_eq!(DeliveryType::from_token("4"), None);
        }

        #[test]
        fn scheduled_wins_over_plain_delivery() {
            assert_eq!(
                DeliveryType::from_token("delivery programado"),
                Some(DeliveryType::ScheduledDelivery)
            );
        }

        #[test]
        fn pickup_needs_no_address_or_fee() {
            assert!(!DeliveryType::Pickup.requires_address());
            assert!(!DeliveryType::Pickup.charges_delivery_fee());
            assert!(DeliveryType::ScheduledDelivery.requires_address());
        }
    }

    mod address_validation {
        use super::*;

        #[test]
        fn accepts_complete_address() {
            assert!(address("Av. Principal 123", "Lima", "Miraflores").is_valid());
        }

        #[test]
        fn rejects_short_street() {
            let err = address("Av 1", "Lima", "Miraflores").validate().unwrap_err();
            assert!(err.to_string().contains("street"));
        }

        #[test]
        fn rejects_two_letter_city() {
            assert!(!address("Av. Principal 123", "Li", "Miraflores").is_valid());
        }

        #[test]
        fn rejects_empty_district() {
            let err = address("Av. Principal 123", "Lima", "  ").validate().unwrap_err();
            assert_eq!(err, ValidationError::empty_field("district"));
        }

        #[test]
        fn one_line_includes_postal_code_when_present() {
            let mut addr = address("Av. Principal 123", "Lima", "Miraflores");
            addr.postal_code = Some("15074".to_string());
            assert_eq!(addr.one_line(), "Av. Principal 123, Miraflores, Lima, 15074, Peru");
        }
    }
}
