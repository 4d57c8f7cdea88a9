//! Conversation session aggregate.
//!
//! A session tracks where one end user is in the purchase journey with one
//! bot: the current intent and step, the typed context accumulated by the
//! sub-flows, and the ordered message history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BotId, DomainError, ErrorCode, SessionId, SessionKey, StateMachine, Timestamp, UserAddress,
};

use super::context::SessionContext;
use super::intent::{Intent, Step};
use super::message::ChatMessage;
use super::status::{EndReason, SessionStatus};

/// Default time-to-live, counted from the last activity.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// One logical conversation between a user and a bot.
///
/// # Invariants
///
/// - `current_step` always belongs to `current_intent`
/// - `expires_at == last_activity_at + ttl_hours`
/// - `messages` is in processing order and never longer than the bound
///   passed to [`ConversationSession::record_message`]
/// - an ended session is never reopened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSession {
    session_id: SessionId,
    user_id: UserAddress,
    bot_id: BotId,
    sub_domain: String,
    current_intent: Intent,
    current_step: Step,
    context: SessionContext,
    messages: Vec<ChatMessage>,
    ttl_hours: i64,
    created_at: Timestamp,
    last_activity_at: Timestamp,
    expires_at: Timestamp,
    status: SessionStatus,
    end_reason: Option<EndReason>,
}

impl ConversationSession {
    /// Starts a fresh idle session at `now`.
    pub fn new(
        user_id: UserAddress,
        bot_id: BotId,
        sub_domain: impl Into<String>,
        ttl_hours: i64,
        now: Timestamp,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            user_id,
            bot_id,
            sub_domain: sub_domain.into(),
            current_intent: Intent::Idle,
            current_step: Step::Start,
            context: SessionContext::default(),
            messages: Vec::new(),
            ttl_hours,
            created_at: now,
            last_activity_at: now,
            expires_at: now.plus_hours(ttl_hours),
            status: SessionStatus::Active,
            end_reason: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_id(&self) -> &UserAddress {
        &self.user_id
    }

    pub fn bot_id(&self) -> &BotId {
        &self.bot_id
    }

    /// The (user, bot) pair this session is unique for.
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.user_id.clone(), self.bot_id.clone())
    }

    pub fn sub_domain(&self) -> &str {
        &self.sub_domain
    }

    pub fn current_intent(&self) -> Intent {
        self.current_intent
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Mutable access for the state machine and its sub-flows.
    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn ttl_hours(&self) -> i64 {
        self.ttl_hours
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn last_activity_at(&self) -> &Timestamp {
        &self.last_activity_at
    }

    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves the session to `intent`/`step`.
    ///
    /// # Errors
    ///
    /// - `SessionEnded` if the session has ended
    /// - `InvalidStateTransition` if `step` does not belong to `intent`
    pub fn transition(&mut self, intent: Intent, step: Step) -> Result<(), DomainError> {
        self.ensure_active()?;
        if step.intent() != intent {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Step '{}' does not belong to intent '{}'", step, intent),
            )
            .with_detail("intent", intent.as_str())
            .with_detail("step", step.as_str()));
        }
        self.current_intent = intent;
        self.current_step = step;
        Ok(())
    }

    /// Appends to the history, dropping the oldest entries beyond `max_messages`.
    pub fn record_message(&mut self, message: ChatMessage, max_messages: usize) {
        self.messages.push(message);
        if self.messages.len() > max_messages {
            let excess = self.messages.len() - max_messages;
            self.messages.drain(..excess);
        }
    }

    /// Refreshes activity and pushes the expiry out by the session TTL.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity_at = now;
        self.expires_at = now.plus_hours(self.ttl_hours);
    }

    /// Ends the session. Returns `false` when it had already ended, in which
    /// case the original reason is kept.
    pub fn end(&mut self, reason: EndReason) -> bool {
        match self.status.transition_to(SessionStatus::Ended) {
            Ok(next) => {
                self.status = next;
                self.end_reason = Some(reason);
                true
            }
            Err(_) => false,
        }
    }

    /// True when the session is still marked active but its TTL has passed.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        self.is_active() && !now.is_before(&self.expires_at)
    }

    /// Ends the session with [`EndReason::Expired`] if its TTL has passed.
    pub fn expire_if_due(&mut self, now: &Timestamp) -> bool {
        if self.is_expired(now) {
            self.end(EndReason::Expired)
        } else {
            false
        }
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::SessionEnded,
                "Cannot modify an ended session",
            ))
        }
    }
}
