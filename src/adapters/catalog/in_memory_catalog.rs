//! In-memory catalog.
//!
//! Read-only product data built up front, either with the builder methods
//! or from a YAML seed document:
//!
//! ```yaml
//! products:
//!   - id: P1
//!     name: Pizza
//!     presentations:
//!       - id: grande
//!         name: Grande
//!         price: "10.00"
//!         discount: { kind: percentage, value: "20" }
//! modifiers:
//!   - id: M1
//!     options:
//!       - { id: O1, name: Extra queso, price: "2.50" }
//! ```
//!
//! The first presentation of a product is its default. Tests can flip the
//! catalog to unavailable to simulate a collaborator failure.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{Money, ModifierId, OptionId, PresentationId, ProductId};
use crate::domain::pricing::{Discount, MenuEntry, ModifierOption, Presentation};
use crate::ports::{CatalogError, CatalogLookup};

/// Errors loading a catalog seed.
#[derive(Debug, Error)]
pub enum CatalogSeedError {
    #[error("Failed to read catalog seed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog seed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Product {0} has no presentations")]
    NoPresentations(String),
}

#[derive(Debug, Deserialize)]
struct CatalogSeed {
    #[serde(default)]
    products: Vec<ProductSeed>,
    #[serde(default)]
    modifiers: Vec<ModifierSeed>,
}

#[derive(Debug, Deserialize)]
struct ProductSeed {
    id: ProductId,
    name: String,
    presentations: Vec<PresentationSeed>,
}

#[derive(Debug, Deserialize)]
struct PresentationSeed {
    #[serde(default)]
    id: Option<PresentationId>,
    name: String,
    price: Money,
    #[serde(default)]
    discount: Option<Discount>,
}

#[derive(Debug, Deserialize)]
struct ModifierSeed {
    id: ModifierId,
    options: Vec<OptionSeed>,
}

#[derive(Debug, Deserialize)]
struct OptionSeed {
    id: OptionId,
    name: String,
    price: Money,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// In-memory implementation of [`CatalogLookup`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// Product ids in menu order.
    order: Vec<ProductId>,
    presentations: HashMap<ProductId, Vec<Presentation>>,
    options: HashMap<(ModifierId, OptionId), ModifierOption>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a presentation to a product, registering the product on first use.
    pub fn with_presentation(mut self, product_id: ProductId, presentation: Presentation) -> Self {
        if !self.presentations.contains_key(&product_id) {
            self.order.push(product_id.clone());
        }
        self.presentations
            .entry(product_id)
            .or_default()
            .push(presentation);
        self
    }

    pub fn with_option(
        mut self,
        modifier_id: ModifierId,
        option_id: OptionId,
        option: ModifierOption,
    ) -> Self {
        self.options.insert((modifier_id, option_id), option);
        self
    }

    /// Builds a catalog from a YAML seed document.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogSeedError> {
        let seed: CatalogSeed = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::new();

        for product in seed.products {
            if product.presentations.is_empty() {
                return Err(CatalogSeedError::NoPresentations(
                    product.id.as_str().to_string(),
                ));
            }
            for p in product.presentations {
                catalog = catalog.with_presentation(
                    product.id.clone(),
                    Presentation {
                        id: p.id,
                        product_name: product.name.clone(),
                        name: p.name,
                        price: p.price,
                        discount: p.discount,
                    },
                );
            }
        }

        for modifier in seed.modifiers {
            for o in modifier.options {
                catalog = catalog.with_option(
                    modifier.id.clone(),
                    o.id,
                    ModifierOption {
                        name: o.name,
                        price: o.price,
                        active: o.active,
                    },
                );
            }
        }

        Ok(catalog)
    }

    /// Reads a YAML seed from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogSeedError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Makes every lookup fail with `Unavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn product_count(&self) -> usize {
        self.order.len()
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "in-memory catalog switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn resolve_presentation(
        &self,
        product_id: &ProductId,
        presentation_id: Option<&PresentationId>,
    ) -> Result<Presentation, CatalogError> {
        self.check_available()?;
        let presentations = self
            .presentations
            .get(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.as_str().to_string()))?;

        let found = match presentation_id {
            Some(wanted) => presentations
                .iter()
                .find(|p| p.id.as_ref() == Some(wanted)),
            None => presentations.first(),
        };

        found.cloned().ok_or_else(|| {
            CatalogError::NotFound(format!(
                "{}/{}",
                product_id.as_str(),
                presentation_id.map(|p| p.as_str()).unwrap_or_default()
            ))
        })
    }

    async fn resolve_modifier_option(
        &self,
        modifier_id: &ModifierId,
        option_id: &OptionId,
    ) -> Result<ModifierOption, CatalogError> {
        self.check_available()?;
        self.options
            .get(&(modifier_id.clone(), option_id.clone()))
            .cloned()
            .ok_or_else(|| {
                CatalogError::NotFound(format!("{}:{}", modifier_id.as_str(), option_id.as_str()))
            })
    }

    async fn list_menu(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        self.check_available()?;
        let mut entries = Vec::new();
        for product_id in &self.order {
            for presentation in self.presentations.get(product_id).into_iter().flatten() {
                entries.push(MenuEntry {
                    product_id: product_id.clone(),
                    presentation: presentation.clone(),
                });
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::DiscountKind;
    use std::io::Write;

    const SEED: &str = r#"
products:
  - id: P1
    name: Pizza
    presentations:
      - id: grande
        name: Grande
        price: "10.00"
        discount: { kind: percentage, value: "20" }
      - id: personal
        name: Personal
        price: "6.00"
  - id: P2
    name: Gaseosa
    presentations:
      - name: 500ml
        price: "3.50"
modifiers:
  - id: M1
    options:
      - { id: O1, name: Extra queso, price: "2.50" }
      - { id: O2, name: Piña, price: "1.00", active: false }
"#;

    fn pid(s: &str) -> ProductId {
        ProductId::new(s).unwrap()
    }

    mod seed_loading {
        use super::*;

        #[test]
        fn loads_products_in_order() {
            let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
            assert_eq!(catalog.product_count(), 2);
        }

        #[test]
        fn rejects_product_without_presentations() {
            let yaml = "products:\n  - id: P9\n    name: Nada\n    presentations: []\n";
            assert!(matches!(
                InMemoryCatalog::from_yaml(yaml),
                Err(CatalogSeedError::NoPresentations(id)) if id == "P9"
            ));
        }

        #[test]
        fn loads_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(SEED.as_bytes()).unwrap();
            let catalog = InMemoryCatalog::from_path(file.path()).unwrap();
            assert_eq!(catalog.product_count(), 2);
        }
    }

    mod lookups {
        use super::*;

        #[tokio::test]
        async fn default_presentation_is_the_first() {
            let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
            let p = catalog.resolve_presentation(&pid("P1"), None).await.unwrap();
            assert_eq!(p.name, "Grande");
            assert_eq!(p.product_name, "Pizza");
            assert_eq!(p.discount.map(|d| d.kind), Some(DiscountKind::Percentage));
        }

        #[tokio::test]
        async fn named_presentation() {
            let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
            let wanted = PresentationId::new("personal").unwrap();
            let p = catalog
                .resolve_presentation(&pid("P1"), Some(&wanted))
                .await
                .unwrap();
            assert_eq!(p.price, Money::new(600, 2));
        }

        #[tokio::test]
        async fn unknown_product_or_presentation_is_not_found() {
            let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
            assert!(matches!(
                catalog.resolve_presentation(&pid("P404"), None).await,
                Err(CatalogError::NotFound(_))
            ));
            let wanted = PresentationId::new("familiar").unwrap();
            assert!(matches!(
                catalog.resolve_presentation(&pid("P1"), Some(&wanted)).await,
                Err(CatalogError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn modifier_options_keep_their_active_flag() {
            let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
            let m1 = ModifierId::new("M1").unwrap();
            let o2 = catalog
                .resolve_modifier_option(&m1, &OptionId::new("O2").unwrap())
                .await
                .unwrap();
            assert!(!o2.active);
            assert!(matches!(
                catalog
                    .resolve_modifier_option(&m1, &OptionId::new("O9").unwrap())
                    .await,
                Err(CatalogError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn menu_lists_every_presentation() {
            let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
            let menu = catalog.list_menu().await.unwrap();
            let refs: Vec<String> = menu.iter().map(|e| e.reference()).collect();
            assert_eq!(refs, vec!["P1/grande", "P1/personal", "P2"]);
        }
    }

    #[tokio::test]
    async fn unavailable_catalog_fails_every_lookup() {
        let catalog = InMemoryCatalog::from_yaml(SEED).unwrap();
        catalog.set_unavailable(true);
        assert!(matches!(
            catalog.resolve_presentation(&pid("P1"), None).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(matches!(catalog.list_menu().await, Err(CatalogError::Unavailable(_))));

        catalog.set_unavailable(false);
        assert!(catalog.list_menu().await.is_ok());
    }
}
