//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Hours of inactivity before a session expires
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// Messages kept per session; older ones are dropped
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,

    /// Order ids kept in a session's order history
    #[serde(default = "default_max_order_history")]
    pub max_order_history: usize,

    /// Completed support ticket summaries kept per session
    #[serde(default = "default_max_support_tickets")]
    pub max_support_tickets: usize,

    /// Seconds between background expiry sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_hours <= 0 {
            return Err(ValidationError::InvalidTtl);
        }
        if self.max_history_messages == 0
            || self.max_order_history == 0
            || self.max_support_tickets == 0
        {
            return Err(ValidationError::InvalidHistoryBound);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            max_history_messages: default_max_history_messages(),
            max_order_history: default_max_order_history(),
            max_support_tickets: default_max_support_tickets(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_ttl_hours() -> i64 {
    24
}

fn default_max_history_messages() -> usize {
    50
}

fn default_max_order_history() -> usize {
    20
}

fn default_max_support_tickets() -> usize {
    20
}

fn default_sweep_interval() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.ttl_hours, 24);
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_bounds() {
        let ttl = SessionConfig {
            ttl_hours: 0,
            ..Default::default()
        };
        assert!(matches!(ttl.validate(), Err(ValidationError::InvalidTtl)));

        let history = SessionConfig {
            max_history_messages: 0,
            ..Default::default()
        };
        assert!(matches!(
            history.validate(),
            Err(ValidationError::InvalidHistoryBound)
        ));

        let tickets = SessionConfig {
            max_support_tickets: 0,
            ..Default::default()
        };
        assert!(matches!(
            tickets.validate(),
            Err(ValidationError::InvalidHistoryBound)
        ));
    }
}
