//! Classifier output.

use serde::{Deserialize, Serialize};

use crate::domain::order::{DeliveryType, PaymentMethod};

/// What an inbound message means in the session's current intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Greeting,
    MenuBrowse,
    OrderStart,
    SupportRequest,
    Confirm,
    AddMore,
    End,
    PaymentMethod(PaymentMethod),
    DeliveryMode(DeliveryType),
    /// No rule group matched; sub-flows treat the text as free input.
    Unrecognized,
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Greeting => TriggerKind::Greeting,
            Trigger::MenuBrowse => TriggerKind::MenuBrowse,
            Trigger::OrderStart => TriggerKind::OrderStart,
            Trigger::SupportRequest => TriggerKind::SupportRequest,
            Trigger::Confirm => TriggerKind::Confirm,
            Trigger::AddMore => TriggerKind::AddMore,
            Trigger::End => TriggerKind::End,
            Trigger::PaymentMethod(_) => TriggerKind::PaymentMethod,
            Trigger::DeliveryMode(_) => TriggerKind::DeliveryMode,
            Trigger::Unrecognized => TriggerKind::Unrecognized,
        }
    }
}

/// Payload-free trigger discriminant, used as a transition table key and as
/// the rule group name in classifier tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Greeting,
    MenuBrowse,
    OrderStart,
    SupportRequest,
    Confirm,
    AddMore,
    End,
    PaymentMethod,
    DeliveryMode,
    Unrecognized,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 10] = [
        TriggerKind::Greeting,
        TriggerKind::MenuBrowse,
        TriggerKind::OrderStart,
        TriggerKind::SupportRequest,
        TriggerKind::Confirm,
        TriggerKind::AddMore,
        TriggerKind::End,
        TriggerKind::PaymentMethod,
        TriggerKind::DeliveryMode,
        TriggerKind::Unrecognized,
    ];
}
