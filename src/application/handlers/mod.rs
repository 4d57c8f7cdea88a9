//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;

pub use conversation::{
    ChangeIntentCommand, ChangeIntentError, ChangeIntentHandler, ConversationSettings,
    EndConversationCommand, EndConversationError, EndConversationHandler, GetSessionError,
    GetSessionHandler, GetSessionQuery, HandleInboundMessageCommand, HandleInboundMessageHandler,
    HandleInboundMessageResult, HandleMessageError, ListActiveSessionsHandler,
    ListActiveSessionsQuery, TurnOutcome,
};
