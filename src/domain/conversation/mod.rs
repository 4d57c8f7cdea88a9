//! Conversation domain module.
//!
//! Everything that turns an inbound chat message into the next reply:
//! classification, the transition table, item parsing, the sub-flow engines
//! and the intent state machine that ties them together.

mod classifier;
mod engine;
pub mod flows;
mod item_parser;
pub mod replies;
mod transitions;
mod trigger;

pub use classifier::{Classifier, ClassifierError, KeywordClassifier, RuleGroup};
pub use engine::{Directive, FlowSettings, IntentStateMachine, ItemRejection};
pub use item_parser::{parse_item_request, ItemParseError, ItemRequest, ModifierRequest};
pub use transitions::{lookup, Action, Next, StepMatch, Transition, TriggerMatch, TRANSITIONS};
pub use trigger::{Trigger, TriggerKind};
