//! Application layer - session lifecycle, order assembly and handlers.
//!
//! This layer coordinates the domain with the ports. The handlers are the
//! operations exposed to callers; `HandleInboundMessageHandler` is the
//! conversation orchestrator.

pub mod handlers;
mod item_resolver;
mod order_assembly;
mod session_locks;
mod session_store;
mod session_sweeper;

pub use handlers::{
    ChangeIntentCommand, ChangeIntentError, ChangeIntentHandler, ConversationSettings,
    EndConversationCommand, EndConversationError, EndConversationHandler, GetSessionError,
    GetSessionHandler, GetSessionQuery, HandleInboundMessageCommand, HandleInboundMessageHandler,
    HandleInboundMessageResult, HandleMessageError, ListActiveSessionsHandler,
    ListActiveSessionsQuery, TurnOutcome,
};
pub use item_resolver::{ItemResolutionError, ItemResolver};
pub use order_assembly::{AssemblyError, OrderAssembler, OrderPricing};
pub use session_locks::SessionLocks;
pub use session_store::SessionStore;
pub use session_sweeper::{SessionSweeper, SessionSweeperConfig, SweepReport};
