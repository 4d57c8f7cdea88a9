//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, money, errors)
//! - `session` - Conversation sessions, intents/steps and typed context
//! - `pricing` - Pure pricing of presentations, line items and orders
//! - `order` - Orders, line items, payment methods and delivery details
//! - `conversation` - Classifier, transition table, sub-flows and the
//!   intent state machine

pub mod conversation;
pub mod foundation;
pub mod order;
pub mod pricing;
pub mod session;
