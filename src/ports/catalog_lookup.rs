//! Catalog lookup port.
//!
//! Read-only access to products, presentations and modifier options. The
//! conversation never writes to the catalog.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ModifierId, OptionId, PresentationId, ProductId};
use crate::domain::pricing::{MenuEntry, ModifierOption, Presentation};

/// Catalog failures. `NotFound` is a definite answer; `Unavailable` is a
/// transient failure of the catalog itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Not found in catalog: {0}")]
    NotFound(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Resolves a product's presentation. Without `presentation_id` the
    /// product's default presentation is returned.
    async fn resolve_presentation(
        &self,
        product_id: &ProductId,
        presentation_id: Option<&PresentationId>,
    ) -> Result<Presentation, CatalogError>;

    async fn resolve_modifier_option(
        &self,
        modifier_id: &ModifierId,
        option_id: &OptionId,
    ) -> Result<ModifierOption, CatalogError>;

    /// Every orderable presentation, in menu order.
    async fn list_menu(&self) -> Result<Vec<MenuEntry>, CatalogError>;
}
