//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, money helpers and error types
//! that form the vocabulary of the ordering domain.

mod errors;
mod ids;
mod money;
mod state_machine;
mod text;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    BotId, ModifierId, OptionId, OrderId, PresentationId, ProductId, SessionId, SessionKey,
    UserAddress,
};
pub use money::{format_amount, round_money, Money};
pub use state_machine::StateMachine;
pub use text::{contains_phrase, normalize_text};
pub use timestamp::Timestamp;
