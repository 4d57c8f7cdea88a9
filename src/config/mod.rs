//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ORDER_CONCIERGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use order_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sessions live {}h", config.session.ttl_hours);
//! ```

mod error;
mod flow;
mod pricing;
mod server;
mod session;

pub use error::{ConfigError, ValidationError};
pub use flow::FlowConfig;
pub use pricing::PricingConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

use crate::application::{ConversationSettings, OrderPricing};
use crate::domain::conversation::FlowSettings;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Environment and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// Session TTL, history bounds and sweeping
    #[serde(default)]
    pub session: SessionConfig,

    /// Tax, fees and currency rendering
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Conversation flow options
    #[serde(default)]
    pub flow: FlowConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ORDER_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ORDER_CONCIERGE__SESSION__TTL_HOURS=12` -> `session.ttl_hours = 12`
    /// - `ORDER_CONCIERGE__PRICING__TAX_RATE=0.18` -> `pricing.tax_rate = 0.18`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ORDER_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.session.validate()?;
        self.pricing.validate()?;
        self.flow.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Settings for the intent state machine.
    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            currency_symbol: self.pricing.currency_symbol.clone(),
            max_item_quantity: self.pricing.max_item_quantity,
            ask_delivery_mode: self.flow.ask_delivery_mode,
            pickup_instructions: self.flow.pickup_instructions.clone(),
            bank_account: self.flow.bank_account.clone(),
            max_order_history: self.session.max_order_history,
            max_support_tickets: self.session.max_support_tickets,
        }
    }

    /// Store-wide pricing for order assembly.
    pub fn order_pricing(&self) -> OrderPricing {
        OrderPricing {
            tax_rate: self.pricing.tax_rate,
            delivery_fee: self.pricing.delivery_fee,
        }
    }

    /// Session limits for the orchestrator.
    pub fn conversation_settings(&self) -> ConversationSettings {
        ConversationSettings {
            ttl_hours: self.session.ttl_hours,
            max_history_messages: self.session.max_history_messages,
        }
    }
}
