//! HandleInboundMessageHandler - the conversation orchestrator.
//!
//! One pass per inbound message, under the conversation's lock:
//!
//! 1. load or create the session
//! 2. run the intent state machine on a working copy
//! 3. perform the I/O it asks for (menu, item pricing, order assembly)
//! 4. record both sides of the exchange and persist the session
//! 5. deliver the reply through the transport
//!
//! A collaborator failure in step 3 aborts the pass before anything is
//! saved, so retrying the same message is safe. The user gets a generic
//! apology and the caller gets the error.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::{
    AssemblyError, ItemResolutionError, ItemResolver, OrderAssembler, SessionLocks, SessionStore,
};
use crate::domain::conversation::{
    replies, Directive, IntentStateMachine, ItemRejection,
};
use crate::domain::foundation::{
    BotId, DomainError, OrderId, ProductId, SessionId, SessionKey, Timestamp, UserAddress,
};
use crate::domain::session::{ChatMessage, ConversationSession, Intent, Step};
use crate::ports::{CatalogLookup, MessageTransport, SessionStoreError};

/// An inbound chat message.
#[derive(Debug, Clone)]
pub struct HandleInboundMessageCommand {
    pub bot_id: BotId,
    pub user_id: UserAddress,
    pub sub_domain: String,
    pub text: String,
}

/// What the turn did, beyond the reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied,
    ItemAdded,
    /// The referenced product, presentation or option does not exist.
    ItemNotFound { product_id: ProductId },
    /// The line exists but could not be priced (inactive option, bad price).
    ItemRejected { reason: String },
    OrderPlaced { order_id: OrderId },
    Ended,
}

#[derive(Debug, Clone)]
pub struct HandleInboundMessageResult {
    pub session_id: SessionId,
    pub reply: Option<String>,
    pub outcome: TurnOutcome,
    pub intent: Intent,
    pub step: Step,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleMessageError {
    #[error(transparent)]
    Session(#[from] SessionStoreError),

    #[error("Catalog unavailable: {0}")]
    Catalog(String),

    #[error("Order assembly failed: {0}")]
    Order(#[from] AssemblyError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Session limits applied by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationSettings {
    pub ttl_hours: i64,
    pub max_history_messages: usize,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            ttl_hours: crate::domain::session::DEFAULT_TTL_HOURS,
            max_history_messages: 50,
        }
    }
}

pub struct HandleInboundMessageHandler {
    sessions: Arc<SessionStore>,
    locks: SessionLocks,
    machine: Arc<IntentStateMachine>,
    catalog: Arc<dyn CatalogLookup>,
    resolver: ItemResolver,
    assembler: Arc<OrderAssembler>,
    transport: Arc<dyn MessageTransport>,
    settings: ConversationSettings,
}

impl HandleInboundMessageHandler {
    pub fn new(
        sessions: Arc<SessionStore>,
        locks: SessionLocks,
        machine: Arc<IntentStateMachine>,
        catalog: Arc<dyn CatalogLookup>,
        assembler: Arc<OrderAssembler>,
        transport: Arc<dyn MessageTransport>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            sessions,
            locks,
            machine,
            resolver: ItemResolver::new(catalog.clone()),
            catalog,
            assembler,
            transport,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleInboundMessageCommand,
    ) -> Result<HandleInboundMessageResult, HandleMessageError> {
        let key = SessionKey::new(cmd.user_id.clone(), cmd.bot_id.clone());
        let _guard = self.locks.acquire(&key).await;

        let stored = self
            .sessions
            .get_or_create(
                cmd.user_id.clone(),
                cmd.bot_id.clone(),
                &cmd.sub_domain,
                self.settings.ttl_hours,
            )
            .await?;

        let mut session = stored.clone();
        let (reply, outcome) = match self.run_turn(&mut session, &cmd.text).await {
            Ok(turn) => turn,
            Err(e) => {
                error!(
                    session_id = %stored.id(),
                    intent = %stored.current_intent(),
                    step = %stored.current_step(),
                    error = %e,
                    "Turn failed, session left unchanged"
                );
                self.deliver(&cmd.user_id, &replies::apology()).await;
                return Err(e);
            }
        };

        let max = self.settings.max_history_messages;
        session.record_message(ChatMessage::user(cmd.text.as_str()), max);
        session.record_message(ChatMessage::bot(reply.as_str()), max);
        self.sessions.save(&mut session).await?;

        debug!(
            session_id = %session.id(),
            from_intent = %stored.current_intent(),
            from_step = %stored.current_step(),
            intent = %session.current_intent(),
            step = %session.current_step(),
            outcome = ?outcome,
            "Turn processed"
        );

        self.deliver(&cmd.user_id, &reply).await;

        Ok(HandleInboundMessageResult {
            session_id: *session.id(),
            reply: Some(reply),
            outcome,
            intent: session.current_intent(),
            step: session.current_step(),
        })
    }

    async fn run_turn(
        &self,
        session: &mut ConversationSession,
        text: &str,
    ) -> Result<(String, TurnOutcome), HandleMessageError> {
        let today = Timestamp::now().date();
        let turn = match self.machine.handle(session, text, today)? {
            Directive::Reply(reply) => (reply, TurnOutcome::Replied),
            Directive::End(reply) => (reply, TurnOutcome::Ended),
            Directive::ShowMenu => {
                let entries = self
                    .catalog
                    .list_menu()
                    .await
                    .map_err(|e| HandleMessageError::Catalog(e.to_string()))?;
                (self.machine.render_menu(&entries), TurnOutcome::Replied)
            }
            Directive::ResolveItem(request) => match self.resolver.resolve(&request).await {
                Ok(item) => (
                    self.machine.apply_resolved_item(session, Ok(item))?,
                    TurnOutcome::ItemAdded,
                ),
                Err(ItemResolutionError::Rejected(rejection)) => {
                    let outcome = match &rejection {
                        ItemRejection::NotFound { product_id, .. } => TurnOutcome::ItemNotFound {
                            product_id: product_id.clone(),
                        },
                        other => TurnOutcome::ItemRejected {
                            reason: other.to_string(),
                        },
                    };
                    (self.machine.apply_resolved_item(session, Err(rejection))?, outcome)
                }
                Err(ItemResolutionError::CatalogUnavailable(reason)) => {
                    return Err(HandleMessageError::Catalog(reason));
                }
            },
            Directive::AssembleOrder => {
                let order = self.assembler.create_or_update(session).await?;
                let reply = self.machine.complete_order(session, &order)?;
                let outcome = order
                    .id
                    .map_or(TurnOutcome::Replied, |order_id| TurnOutcome::OrderPlaced { order_id });
                (reply, outcome)
            }
        };
        Ok(turn)
    }

    /// Best effort: the transport owns retries, a lost reply does not fail
    /// the turn.
    async fn deliver(&self, user_id: &UserAddress, text: &str) {
        if let Err(e) = self.transport.send_text(user_id, text).await {
            warn!(user_id = %user_id, error = %e, "Reply delivery failed");
        }
    }
}
