//! Conversation command and query handlers.
//!
//! `HandleInboundMessageHandler` is the orchestrator for chat traffic; the
//! rest are the session operations exposed to callers.

mod change_intent;
mod end_conversation;
mod get_session;
mod handle_inbound_message;
mod list_active_sessions;

pub use change_intent::{ChangeIntentCommand, ChangeIntentError, ChangeIntentHandler};
pub use end_conversation::{
    EndConversationCommand, EndConversationError, EndConversationHandler,
};
pub use get_session::{GetSessionError, GetSessionHandler, GetSessionQuery};
pub use handle_inbound_message::{
    ConversationSettings, HandleInboundMessageCommand, HandleInboundMessageHandler,
    HandleInboundMessageResult, HandleMessageError, TurnOutcome,
};
pub use list_active_sessions::{ListActiveSessionsHandler, ListActiveSessionsQuery};
