//! Conversation flow configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Ask delivery, pickup or scheduled before collecting an address
    #[serde(default)]
    pub ask_delivery_mode: bool,

    /// Text sent with pickup orders
    #[serde(default = "default_pickup_instructions")]
    pub pickup_instructions: String,

    /// Account details quoted in bank transfer instructions
    #[serde(default = "default_bank_account")]
    pub bank_account: String,

    /// YAML rule table replacing the built-in classifier keywords
    pub classifier_rules_path: Option<PathBuf>,

    /// YAML catalog seed for the in-memory catalog
    pub catalog_path: Option<PathBuf>,
}

impl FlowConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pickup_instructions.trim().is_empty() {
            return Err(ValidationError::MissingRequired("flow.pickup_instructions"));
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            ask_delivery_mode: false,
            pickup_instructions: default_pickup_instructions(),
            bank_account: default_bank_account(),
            classifier_rules_path: None,
            catalog_path: None,
        }
    }
}

fn default_pickup_instructions() -> String {
    "Acércate al local y muestra el número de tu pedido.".to_string()
}

fn default_bank_account() -> String {
    "(consulta la cuenta con el negocio)".to_string()
}
