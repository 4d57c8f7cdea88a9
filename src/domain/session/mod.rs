//! Session domain module.
//!
//! Conversation sessions: the intent/step position of one (user, bot) pair,
//! the typed context the sub-flows accumulate, and the message history.

mod aggregate;
mod context;
mod intent;
mod message;
mod status;

pub use aggregate::{ConversationSession, DEFAULT_TTL_HOURS};
pub use context::{
    AddressDraft, AddressStep, DeliveryContext, OrderContext, PaymentContext, SessionContext,
    SupportContext,
};
pub use intent::{Intent, Step};
pub use message::{ChatMessage, MessageRole};
pub use status::{EndReason, SessionStatus};
