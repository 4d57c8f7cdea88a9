//! Intents and the steps scoped to each of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The top-level purpose currently being served in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[default]
    Idle,
    Menu,
    Order,
    Support,
    Payment,
    Delivery,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Idle,
        Intent::Menu,
        Intent::Order,
        Intent::Support,
        Intent::Payment,
        Intent::Delivery,
    ];

    /// Step a session lands on when it enters this intent without an
    /// explicit step.
    pub fn entry_step(&self) -> Step {
        match self {
            Intent::Idle => Step::Start,
            Intent::Menu => Step::Browsing,
            Intent::Order => Step::Selecting,
            Intent::Support => Step::CollectingIssue,
            Intent::Payment => Step::ProcessingPayment,
            Intent::Delivery => Step::CollectingAddress,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Idle => "idle",
            Intent::Menu => "menu",
            Intent::Order => "order",
            Intent::Support => "support",
            Intent::Payment => "payment",
            Intent::Delivery => "delivery",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|i| i.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_format("intent", format!("unknown intent '{}'", s)))
    }
}

/// A sub-state within an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    // idle
    #[default]
    Start,
    Greeting,
    OrderCompleted,
    SupportCompleted,
    // menu
    Browsing,
    // order
    Selecting,
    Confirming,
    // payment
    ProcessingPayment,
    // delivery
    #[serde(rename = "choosing_delivery_mode")]
    ChoosingMode,
    CollectingDate,
    CollectingAddress,
    // support
    CollectingIssue,
    CollectingContact,
    CollectingEmail,
}

impl Step {
    pub const ALL: [Step; 14] = [
        Step::Start,
        Step::Greeting,
        Step::OrderCompleted,
        Step::SupportCompleted,
        Step::Browsing,
        Step::Selecting,
        Step::Confirming,
        Step::ProcessingPayment,
        Step::ChoosingMode,
        Step::CollectingDate,
        Step::CollectingAddress,
        Step::CollectingIssue,
        Step::CollectingContact,
        Step::CollectingEmail,
    ];

    /// The intent that owns this step.
    pub fn intent(&self) -> Intent {
        match self {
            Step::Start | Step::Greeting | Step::OrderCompleted | Step::SupportCompleted => {
                Intent::Idle
            }
            Step::Browsing => Intent::Menu,
            Step::Selecting | Step::Confirming => Intent::Order,
            Step::ProcessingPayment => Intent::Payment,
            Step::ChoosingMode | Step::CollectingDate | Step::CollectingAddress => {
                Intent::Delivery
            }
            Step::CollectingIssue | Step::CollectingContact | Step::CollectingEmail => {
                Intent::Support
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Greeting => "greeting",
            Step::OrderCompleted => "order_completed",
            Step::SupportCompleted => "support_completed",
            Step::Browsing => "browsing",
            Step::Selecting => "selecting",
            Step::Confirming => "confirming",
            Step::ProcessingPayment => "processing_payment",
            Step::ChoosingMode => "choosing_delivery_mode",
            Step::CollectingDate => "collecting_date",
            Step::CollectingAddress => "collecting_address",
            Step::CollectingIssue => "collecting_issue",
            Step::CollectingContact => "collecting_contact",
            Step::CollectingEmail => "collecting_email",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Step {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_format("step", format!("unknown step '{}'", s)))
    }
}
