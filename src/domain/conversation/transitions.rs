//! Top-level transition table.
//!
//! Every (intent, step, trigger) combination resolves to exactly one row:
//! rows are scanned in order and the first match wins. Each intent ends with
//! a catch-all row, so lookup is total.

use crate::domain::session::{Intent, Step};

use super::trigger::TriggerKind;

/// What the state machine does when a row fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Welcome,
    /// Idle catch-all: explain what the bot can do.
    Help,
    ShowMenu,
    StartOrder,
    StartSupport,
    /// Parse an item reference and resolve it through the catalog.
    ParseItem,
    ConfirmCart,
    AddMore,
    /// Repeat the confirm-or-add-more question.
    PromptConfirm,
    SelectPayment,
    PromptPayment,
    SelectDeliveryMode,
    PromptDeliveryMode,
    ScheduleInput,
    AddressInput,
    SupportInput,
    End,
}

/// Step selector of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMatch {
    Any,
    Is(Step),
}

impl StepMatch {
    fn matches(&self, step: Step) -> bool {
        match self {
            StepMatch::Any => true,
            StepMatch::Is(s) => *s == step,
        }
    }
}

/// Trigger selector of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMatch {
    Any,
    Is(TriggerKind),
}

impl TriggerMatch {
    fn matches(&self, kind: TriggerKind) -> bool {
        match self {
            TriggerMatch::Any => true,
            TriggerMatch::Is(k) => *k == kind,
        }
    }
}

/// Where the session goes once the action succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Keep the current intent and step.
    Stay,
    To(Intent, Step),
    /// The sub-flow picks the next position from its own state.
    SubFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub intent: Intent,
    pub step: StepMatch,
    pub trigger: TriggerMatch,
    pub action: Action,
    pub next: Next,
}

const fn row(
    intent: Intent,
    step: StepMatch,
    trigger: TriggerMatch,
    action: Action,
    next: Next,
) -> Transition {
    Transition {
        intent,
        step,
        trigger,
        action,
        next,
    }
}

use Action as A;
use Intent as I;
use Next as N;
use Step as S;
use StepMatch::{Any as AnyStep, Is as At};
use TriggerKind as K;
use TriggerMatch::{Any as AnyTrigger, Is as On};

/// The full table. Order matters within an intent.
pub static TRANSITIONS: &[Transition] = &[
    // idle
    row(I::Idle, AnyStep, On(K::End), A::End, N::Stay),
    row(I::Idle, AnyStep, On(K::SupportRequest), A::StartSupport, N::To(I::Support, S::CollectingIssue)),
    row(I::Idle, AnyStep, On(K::MenuBrowse), A::ShowMenu, N::To(I::Menu, S::Browsing)),
    row(I::Idle, AnyStep, On(K::OrderStart), A::StartOrder, N::To(I::Order, S::Selecting)),
    row(I::Idle, AnyStep, On(K::Greeting), A::Welcome, N::To(I::Idle, S::Greeting)),
    row(I::Idle, AnyStep, AnyTrigger, A::Help, N::Stay),
    // menu
    row(I::Menu, AnyStep, On(K::End), A::End, N::Stay),
    row(I::Menu, AnyStep, On(K::SupportRequest), A::StartSupport, N::To(I::Support, S::CollectingIssue)),
    row(I::Menu, AnyStep, On(K::MenuBrowse), A::ShowMenu, N::To(I::Menu, S::Browsing)),
    row(I::Menu, AnyStep, On(K::OrderStart), A::StartOrder, N::To(I::Order, S::Selecting)),
    row(I::Menu, AnyStep, On(K::Greeting), A::Welcome, N::To(I::Idle, S::Greeting)),
    row(I::Menu, AnyStep, AnyTrigger, A::ParseItem, N::To(I::Order, S::Confirming)),
    // order
    row(I::Order, AnyStep, On(K::End), A::End, N::Stay),
    row(I::Order, AnyStep, On(K::Confirm), A::ConfirmCart, N::To(I::Payment, S::ProcessingPayment)),
    row(I::Order, AnyStep, On(K::AddMore), A::AddMore, N::To(I::Order, S::Selecting)),
    row(I::Order, At(S::Selecting), AnyTrigger, A::ParseItem, N::To(I::Order, S::Confirming)),
    row(I::Order, AnyStep, AnyTrigger, A::PromptConfirm, N::Stay),
    // payment
    row(I::Payment, AnyStep, On(K::End), A::End, N::Stay),
    row(I::Payment, AnyStep, On(K::PaymentMethod), A::SelectPayment, N::SubFlow),
    row(I::Payment, AnyStep, AnyTrigger, A::PromptPayment, N::Stay),
    // delivery
    row(I::Delivery, AnyStep, On(K::End), A::End, N::Stay),
    row(I::Delivery, At(S::ChoosingMode), On(K::DeliveryMode), A::SelectDeliveryMode, N::SubFlow),
    row(I::Delivery, At(S::ChoosingMode), AnyTrigger, A::PromptDeliveryMode, N::Stay),
    row(I::Delivery, At(S::CollectingDate), AnyTrigger, A::ScheduleInput, N::SubFlow),
    row(I::Delivery, AnyStep, AnyTrigger, A::AddressInput, N::SubFlow),
    // support
    row(I::Support, AnyStep, On(K::End), A::End, N::Stay),
    row(I::Support, AnyStep, AnyTrigger, A::SupportInput, N::SubFlow),
];

/// First row matching the session position and trigger.
pub fn lookup(intent: Intent, step: Step, trigger: TriggerKind) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| {
        t.intent == intent && t.step.matches(step) && t.trigger.matches(trigger)
    })
}
