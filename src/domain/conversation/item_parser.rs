//! Item reference parsing.
//!
//! Grammar, whitespace separated:
//!
//! ```text
//! [qty][x] <productId>[/<presentationId>] [+<modifierId>:<optionId>[x<qty>]]...
//! ```
//!
//! e.g. `2 x P1/grande +M1:O2 +M3:O1x2`. Ids keep their original case.

use thiserror::Error;

use crate::domain::foundation::{ModifierId, OptionId, PresentationId, ProductId};

/// A parsed, not yet priced, cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub product_id: ProductId,
    pub presentation_id: Option<PresentationId>,
    pub quantity: u32,
    pub modifiers: Vec<ModifierRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierRequest {
    pub modifier_id: ModifierId,
    pub option_id: OptionId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemParseError {
    #[error("No product reference given")]
    MissingProduct,

    #[error("Quantity must be between 1 and {max}, got {quantity}")]
    QuantityOutOfRange { quantity: u64, max: u32 },

    #[error("Invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("Invalid modifier '{0}', expected +<modifier>:<option>[x<qty>]")]
    InvalidModifier(String),

    #[error("Unexpected text '{0}' after the product reference")]
    UnexpectedToken(String),
}

/// Parses one item reference; quantities must fall in `1..=max_quantity`.
pub fn parse_item_request(raw: &str, max_quantity: u32) -> Result<ItemRequest, ItemParseError> {
    let mut tokens = raw.split_whitespace().peekable();
    let mut quantity = 1u32;

    let first = tokens.next().ok_or(ItemParseError::MissingProduct)?;
    let product_token = match leading_quantity(first) {
        Some(q) => {
            quantity = check_quantity(q, max_quantity)?;
            if tokens.peek().is_some_and(|t| t.eq_ignore_ascii_case("x")) {
                tokens.next();
            }
            tokens.next().ok_or(ItemParseError::MissingProduct)?
        }
        None => first,
    };

    let (product_id, presentation_id) = parse_product(product_token)?;

    let mut modifiers = Vec::new();
    for token in tokens {
        let spec = token
            .strip_prefix('+')
            .ok_or_else(|| ItemParseError::UnexpectedToken(token.to_string()))?;
        modifiers.push(parse_modifier(spec, token, max_quantity)?);
    }

    Ok(ItemRequest {
        product_id,
        presentation_id,
        quantity,
        modifiers,
    })
}

/// `"2"` or `"2x"` as a quantity; anything else is not a quantity token.
fn leading_quantity(token: &str) -> Option<u64> {
    let digits = token
        .strip_suffix('x')
        .or_else(|| token.strip_suffix('X'))
        .unwrap_or(token);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits.parse().unwrap_or(u64::MAX))
    } else {
        None
    }
}

fn check_quantity(quantity: u64, max: u32) -> Result<u32, ItemParseError> {
    if quantity < 1 || quantity > u64::from(max) {
        return Err(ItemParseError::QuantityOutOfRange { quantity, max });
    }
    Ok(quantity as u32)
}

fn parse_product(
    token: &str,
) -> Result<(ProductId, Option<PresentationId>), ItemParseError> {
    let invalid = || ItemParseError::MissingProduct;
    match token.split_once('/') {
        Some((product, presentation)) => Ok((
            ProductId::new(product).map_err(|_| invalid())?,
            Some(PresentationId::new(presentation).map_err(|_| invalid())?),
        )),
        None => Ok((ProductId::new(token).map_err(|_| invalid())?, None)),
    }
}

fn parse_modifier(
    spec: &str,
    token: &str,
    max_quantity: u32,
) -> Result<ModifierRequest, ItemParseError> {
    let invalid = || ItemParseError::InvalidModifier(token.to_string());
    let (modifier, option) = spec.split_once(':').ok_or_else(invalid)?;

    let (option, quantity) = match option.rsplit_once(['x', 'X']) {
        Some((id, qty)) if !qty.is_empty() && qty.chars().all(|c| c.is_ascii_digit()) => {
            let qty: u64 = qty
                .parse()
                .map_err(|_| ItemParseError::InvalidQuantity(qty.to_string()))?;
            (id, check_quantity(qty, max_quantity)?)
        }
        _ => (option, 1),
    };

    Ok(ModifierRequest {
        modifier_id: ModifierId::new(modifier).map_err(|_| invalid())?,
        option_id: OptionId::new(option).map_err(|_| invalid())?,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 99;

    #[test]
    fn bare_product_defaults_to_one() {
        let req = parse_item_request("P1", MAX).unwrap();
        assert_eq!(req.product_id.as_str(), "P1");
        assert_eq!(req.presentation_id, None);
        assert_eq!(req.quantity, 1);
        assert!(req.modifiers.is_empty());
    }

    #[test]
    fn full_reference() {
        let req = parse_item_request("2 x P1/grande +M1:O2 +M3:O1x2", MAX).unwrap();
        assert_eq!(req.quantity, 2);
        assert_eq!(req.presentation_id.unwrap().as_str(), "grande");
        assert_eq!(req.modifiers.len(), 2);
        assert_eq!(req.modifiers[0].modifier_id.as_str(), "M1");
        assert_eq!(req.modifiers[0].option_id.as_str(), "O2");
        assert_eq!(req.modifiers[0].quantity, 1);
        assert_eq!(req.modifiers[1].option_id.as_str(), "O1");
        assert_eq!(req.modifiers[1].quantity, 2);
    }

    #[test]
    fn compact_quantity_forms() {
        assert_eq!(parse_item_request("3x P2", MAX).unwrap().quantity, 3);
        assert_eq!(parse_item_request("3 P2", MAX).unwrap().quantity, 3);
    }

    #[test]
    fn option_ids_ending_in_x_letters_are_kept() {
        let req = parse_item_request("P1 +M1:extra", MAX).unwrap();
        assert_eq!(req.modifiers[0].option_id.as_str(), "extra");
        assert_eq!(req.modifiers[0].quantity, 1);
    }

    mod rejections {
        use super::*;

        #[test]
        fn empty_text() {
            assert_eq!(parse_item_request("  ", MAX), Err(ItemParseError::MissingProduct));
        }

        #[test]
        fn quantity_without_product() {
            assert_eq!(parse_item_request("2 x", MAX), Err(ItemParseError::MissingProduct));
        }

        #[test]
        fn zero_and_too_large_quantities() {
            assert!(matches!(
                parse_item_request("0 P1", MAX),
                Err(ItemParseError::QuantityOutOfRange { quantity: 0, .. })
            ));
            assert!(matches!(
                parse_item_request("100 P1", MAX),
                Err(ItemParseError::QuantityOutOfRange { quantity: 100, .. })
            ));
            assert!(matches!(
                parse_item_request("99999999999999999999999 P1", MAX),
                Err(ItemParseError::QuantityOutOfRange { .. })
            ));
        }

        #[test]
        fn malformed_modifier() {
            assert!(matches!(
                parse_item_request("P1 +M1", MAX),
                Err(ItemParseError::InvalidModifier(_))
            ));
            assert!(matches!(
                parse_item_request("P1 +M1:O1x0", MAX),
                Err(ItemParseError::QuantityOutOfRange { .. })
            ));
        }

        #[test]
        fn trailing_words() {
            assert!(matches!(
                parse_item_request("pizza grande por favor", MAX),
                Err(ItemParseError::UnexpectedToken(_))
            ));
        }
    }
}
