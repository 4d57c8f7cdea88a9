//! ItemResolver - prices a parsed item reference against the catalog.
//!
//! Catalog `NotFound` answers and pricing failures reject the line (the user
//! is told and the cart is left alone). A catalog outage is a collaborator
//! failure and fails the whole turn.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::{ItemRejection, ItemRequest};
use crate::domain::order::OrderLineItem;
use crate::domain::pricing::{price_modifier, resolve_presentation_price};
use crate::ports::{CatalogError, CatalogLookup};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemResolutionError {
    /// The line cannot enter the cart.
    #[error(transparent)]
    Rejected(#[from] ItemRejection),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

pub struct ItemResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl ItemResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }

    pub async fn resolve(&self, request: &ItemRequest) -> Result<OrderLineItem, ItemResolutionError> {
        let product_reference = match &request.presentation_id {
            Some(p) => format!("{}/{}", request.product_id, p),
            None => request.product_id.to_string(),
        };

        let presentation = self
            .catalog
            .resolve_presentation(&request.product_id, request.presentation_id.as_ref())
            .await
            .map_err(|e| self.classify(e, request, product_reference.clone()))?;

        let mut modifiers = Vec::with_capacity(request.modifiers.len());
        for wanted in &request.modifiers {
            let option = self
                .catalog
                .resolve_modifier_option(&wanted.modifier_id, &wanted.option_id)
                .await
                .map_err(|e| {
                    self.classify(
                        e,
                        request,
                        format!("{}:{}", wanted.modifier_id, wanted.option_id),
                    )
                })?;
            let line = price_modifier(
                wanted.modifier_id.clone(),
                wanted.option_id.clone(),
                &option,
                wanted.quantity,
            )
            .map_err(ItemRejection::from)?;
            modifiers.push(line);
        }

        let name = format!("{} {}", presentation.product_name, presentation.name)
            .trim()
            .to_string();
        let item = OrderLineItem::new(
            request.product_id.clone(),
            name,
            presentation.id.clone().or_else(|| request.presentation_id.clone()),
            resolve_presentation_price(&presentation),
            request.quantity,
            modifiers,
        )
        .map_err(ItemRejection::from)?;
        Ok(item)
    }

    fn classify(
        &self,
        error: CatalogError,
        request: &ItemRequest,
        reference: String,
    ) -> ItemResolutionError {
        match error {
            CatalogError::NotFound(_) => ItemRejection::NotFound {
                product_id: request.product_id.clone(),
                reference,
            }
            .into(),
            CatalogError::Unavailable(reason) => ItemResolutionError::CatalogUnavailable(reason),
        }
    }
}
