//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Session TTL must be at least one hour")]
    InvalidTtl,

    #[error("History bounds must be at least 1")]
    InvalidHistoryBound,

    #[error("Sweep interval must be at least one second")]
    InvalidSweepInterval,

    #[error("Tax rate must be between 0 and 1")]
    InvalidTaxRate,

    #[error("Delivery fee cannot be negative")]
    NegativeDeliveryFee,

    #[error("Maximum item quantity must be at least 1")]
    InvalidQuantityBound,
}
