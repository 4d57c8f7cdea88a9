//! Intent state machine.
//!
//! Classifies an inbound message, looks up the transition row for the
//! session's position and runs the row's action against the session. All
//! work here is synchronous. When an action needs a collaborator (catalog,
//! order store) the machine returns a [`Directive`] instead; the caller
//! performs the I/O and hands the result back through `apply_*` /
//! `complete_order`.

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, ProductId};
use crate::domain::order::{DeliveryType, Order, OrderLineItem, PaymentMethod};
use crate::domain::pricing::{MenuEntry, PricingError};
use crate::domain::session::{ConversationSession, EndReason, Intent, Step};

use super::classifier::Classifier;
use super::flows::address::{self, AddressOutcome};
use super::flows::delivery_mode::{self, ModeOutcome, ScheduleOutcome};
use super::flows::payment;
use super::flows::support::{self, SupportOutcome};
use super::item_parser::{parse_item_request, ItemRequest};
use super::replies;
use super::transitions::{lookup, Action, Next};
use super::trigger::Trigger;

/// Settings that shape replies and sub-flow hand-offs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    pub currency_symbol: String,
    pub max_item_quantity: u32,
    /// Ask delivery/pickup/scheduled before collecting an address.
    pub ask_delivery_mode: bool,
    pub pickup_instructions: String,
    pub bank_account: String,
    pub max_order_history: usize,
    pub max_support_tickets: usize,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "S/".to_string(),
            max_item_quantity: 99,
            ask_delivery_mode: false,
            pickup_instructions: "Acércate al local y muestra el número de tu pedido.".to_string(),
            bank_account: "(consulta la cuenta con el negocio)".to_string(),
            max_order_history: 20,
            max_support_tickets: 20,
        }
    }
}

/// What the caller must do after [`IntentStateMachine::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Send this reply; nothing else to do.
    Reply(String),
    /// Fetch the menu and render it with [`IntentStateMachine::render_menu`].
    ShowMenu,
    /// Resolve and price the item, then call
    /// [`IntentStateMachine::apply_resolved_item`].
    ResolveItem(ItemRequest),
    /// Build and store the order from the session context, then call
    /// [`IntentStateMachine::complete_order`].
    AssembleOrder,
    /// The session has ended; send this farewell.
    End(String),
}

/// Why a requested line could not enter the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemRejection {
    #[error("{reference} not found")]
    NotFound {
        product_id: ProductId,
        reference: String,
    },

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

pub struct IntentStateMachine {
    classifier: Arc<dyn Classifier>,
    settings: FlowSettings,
}

impl IntentStateMachine {
    pub fn new(classifier: Arc<dyn Classifier>, settings: FlowSettings) -> Self {
        Self {
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Processes one inbound message.
    ///
    /// Validation and classification misses come back as `Reply` re-prompts;
    /// errors mean the session could not be moved consistently.
    pub fn handle(
        &self,
        session: &mut ConversationSession,
        text: &str,
        today: NaiveDate,
    ) -> Result<Directive, DomainError> {
        let intent = session.current_intent();
        let step = session.current_step();
        let trigger = self.classifier.classify(intent, text);
        let row = lookup(intent, step, trigger.kind()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("No transition for {}/{} on {:?}", intent, step, trigger.kind()),
            )
        })?;

        debug!(
            session_id = %session.id(),
            intent = %intent,
            step = %step,
            trigger = ?trigger,
            action = ?row.action,
            "Classified inbound message"
        );

        let symbol = self.settings.currency_symbol.as_str();
        let directive = match row.action {
            Action::Welcome => {
                go(session, row.next)?;
                Directive::Reply(replies::welcome())
            }
            Action::Help => Directive::Reply(replies::help()),
            Action::ShowMenu => {
                go(session, row.next)?;
                Directive::ShowMenu
            }
            Action::StartOrder | Action::AddMore => {
                go(session, row.next)?;
                let cart = &session.context().order;
                Directive::Reply(replies::order_prompt(&cart.selected_items, cart.order_total, symbol))
            }
            Action::StartSupport => {
                let reply = support::start(&mut session.context_mut().support);
                go(session, row.next)?;
                Directive::Reply(reply)
            }
            Action::ParseItem => {
                match parse_item_request(text, self.settings.max_item_quantity) {
                    Ok(request) => Directive::ResolveItem(request),
                    Err(err) => Directive::Reply(replies::item_format_error(&err.to_string())),
                }
            }
            Action::ConfirmCart => {
                if session.context().order.is_empty() {
                    session.transition(Intent::Order, Step::Selecting)?;
                    Directive::Reply(replies::empty_cart())
                } else {
                    go(session, row.next)?;
                    let total = session.context().order.order_total;
                    Directive::Reply(payment::prompt(total, symbol))
                }
            }
            Action::PromptConfirm => {
                if session.context().order.is_empty() {
                    session.transition(Intent::Order, Step::Selecting)?;
                    Directive::Reply(replies::empty_cart())
                } else {
                    let cart = &session.context().order;
                    Directive::Reply(replies::confirm_prompt(
                        &cart.selected_items,
                        cart.order_total,
                        symbol,
                    ))
                }
            }
            Action::SelectPayment => {
                let Trigger::PaymentMethod(method) = trigger else {
                    return Err(unexpected_trigger(trigger));
                };
                self.select_payment(session, method)?
            }
            Action::PromptPayment => {
                let total = session.context().order.order_total;
                Directive::Reply(payment::prompt(total, symbol))
            }
            Action::SelectDeliveryMode => {
                let Trigger::DeliveryMode(mode) = trigger else {
                    return Err(unexpected_trigger(trigger));
                };
                match delivery_mode::select(&mut session.context_mut().delivery, mode) {
                    ModeOutcome::CollectAddress(prompt) => {
                        session.transition(Intent::Delivery, Step::CollectingAddress)?;
                        Directive::Reply(prompt)
                    }
                    ModeOutcome::CollectDate(prompt) => {
                        session.transition(Intent::Delivery, Step::CollectingDate)?;
                        Directive::Reply(prompt)
                    }
                    ModeOutcome::Pickup => self.ready_to_assemble(session)?,
                }
            }
            Action::PromptDeliveryMode => Directive::Reply(delivery_mode::prompt()),
            Action::ScheduleInput => {
                match delivery_mode::schedule_input(&mut session.context_mut().delivery, text, today)
                {
                    ScheduleOutcome::Reprompt(prompt) => Directive::Reply(prompt),
                    ScheduleOutcome::CollectAddress(prompt) => {
                        session.transition(Intent::Delivery, Step::CollectingAddress)?;
                        Directive::Reply(prompt)
                    }
                }
            }
            Action::AddressInput => {
                match address::handle_input(&mut session.context_mut().delivery, text) {
                    AddressOutcome::Prompt(prompt) => Directive::Reply(prompt),
                    AddressOutcome::Complete(_) => self.ready_to_assemble(session)?,
                }
            }
            Action::SupportInput => {
                let max_tickets = self.settings.max_support_tickets;
                match support::handle_input(&mut session.context_mut().support, step, text, max_tickets) {
                    SupportOutcome::Stay(prompt) => Directive::Reply(prompt),
                    SupportOutcome::Advance(next, prompt) => {
                        session.transition(Intent::Support, next)?;
                        Directive::Reply(prompt)
                    }
                    SupportOutcome::Complete(summary) => {
                        session.transition(Intent::Idle, Step::SupportCompleted)?;
                        Directive::Reply(summary)
                    }
                }
            }
            Action::End => {
                session.end(EndReason::Cancelled);
                Directive::End(replies::farewell())
            }
        };
        Ok(directive)
    }

    /// Renders the catalog menu for a `ShowMenu` directive.
    pub fn render_menu(&self, entries: &[MenuEntry]) -> String {
        replies::menu(entries, &self.settings.currency_symbol)
    }

    /// Applies the outcome of a `ResolveItem` directive.
    ///
    /// A rejected line leaves the cart and the session position untouched.
    pub fn apply_resolved_item(
        &self,
        session: &mut ConversationSession,
        resolved: Result<OrderLineItem, ItemRejection>,
    ) -> Result<String, DomainError> {
        match resolved {
            Ok(item) => {
                session.context_mut().order.add_item(item);
                session.transition(Intent::Order, Step::Confirming)?;
                let cart = &session.context().order;
                Ok(replies::item_added(
                    &cart.selected_items,
                    cart.order_total,
                    &self.settings.currency_symbol,
                ))
            }
            Err(ItemRejection::NotFound { reference, .. }) => {
                Ok(replies::item_not_found(&reference))
            }
            Err(rejection) => Ok(replies::item_rejected(&rejection.to_string())),
        }
    }

    /// Records a stored order: clears the cart, remembers the order id and
    /// returns the session to idle.
    pub fn complete_order(
        &self,
        session: &mut ConversationSession,
        order: &Order,
    ) -> Result<String, DomainError> {
        let order_id = order.id.ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Stored order has no id")
        })?;
        let ctx = session.context_mut();
        ctx.order.take_items();
        ctx.order.commit(order_id, self.settings.max_order_history);
        ctx.delivery.reset_for_next_order();
        session.transition(Intent::Idle, Step::OrderCompleted)?;
        Ok(replies::order_placed(
            order,
            &self.settings.currency_symbol,
            &self.settings.pickup_instructions,
        ))
    }

    fn select_payment(
        &self,
        session: &mut ConversationSession,
        method: PaymentMethod,
    ) -> Result<Directive, DomainError> {
        let ctx = session.context_mut();
        let instructions = payment::select(&mut ctx.payment, method, &self.settings.bank_account);
        let next_prompt = if self.settings.ask_delivery_mode {
            session.transition(Intent::Delivery, Step::ChoosingMode)?;
            delivery_mode::prompt()
        } else {
            ctx.delivery.delivery_type = Some(DeliveryType::Delivery);
            ctx.delivery.scheduled_for = None;
            let prompt = address::start(&mut ctx.delivery);
            session.transition(Intent::Delivery, Step::CollectingAddress)?;
            prompt
        };
        Ok(Directive::Reply(format!("{}\n\n{}", instructions, next_prompt)))
    }

    /// Checks that the cart and payment are in place before assembly.
    fn ready_to_assemble(&self, session: &mut ConversationSession) -> Result<Directive, DomainError> {
        let ctx = session.context();
        if ctx.order.is_empty() {
            session.transition(Intent::Order, Step::Selecting)?;
            return Ok(Directive::Reply(replies::empty_cart()));
        }
        if ctx.payment.payment_method.is_none() {
            let total = ctx.order.order_total;
            session.transition(Intent::Payment, Step::ProcessingPayment)?;
            return Ok(Directive::Reply(payment::prompt(
                total,
                &self.settings.currency_symbol,
            )));
        }
        Ok(Directive::AssembleOrder)
    }
}

fn go(session: &mut ConversationSession, next: Next) -> Result<(), DomainError> {
    match next {
        Next::To(intent, step) => session.transition(intent, step),
        Next::Stay | Next::SubFlow => Ok(()),
    }
}

fn unexpected_trigger(trigger: Trigger) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Transition row does not match trigger {:?}", trigger),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::KeywordClassifier;
    use crate::domain::foundation::{BotId, Money, OrderId, Timestamp, UserAddress};
    use crate::domain::session::{AddressStep, SessionStatus, DEFAULT_TTL_HOURS};

    fn machine_with(settings: FlowSettings) -> IntentStateMachine {
        IntentStateMachine::new(Arc::new(KeywordClassifier::default()), settings)
    }

    fn machine() -> IntentStateMachine {
        machine_with(FlowSettings::default())
    }

    fn session() -> ConversationSession {
        ConversationSession::new(
            UserAddress::new("+51999").unwrap(),
            BotId::new("B1").unwrap(),
            "pizzeria",
            DEFAULT_TTL_HOURS,
            Timestamp::now(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn pizza(quantity: u32) -> OrderLineItem {
        OrderLineItem::new(
            ProductId::new("P1").unwrap(),
            "Pizza Grande".to_string(),
            None,
            Money::new(3000, 2),
            quantity,
            Vec::new(),
        )
        .unwrap()
    }

    fn reply(directive: Directive) -> String {
        match directive {
            Directive::Reply(text) => text,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    /// Drives a session to delivery/collecting_address with one pizza.
    fn at_address_collection(m: &IntentStateMachine) -> ConversationSession {
        let mut s = session();
        m.handle(&mut s, "quiero pizza", today()).unwrap();
        let directive = m.handle(&mut s, "P1", today()).unwrap();
        assert!(matches!(directive, Directive::ResolveItem(_)));
        m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
        m.handle(&mut s, "si", today()).unwrap();
        m.handle(&mut s, "yape", today()).unwrap();
        s
    }

    mod idle {
        use super::*;

        #[test]
        fn greeting_welcomes() {
            let m = machine();
            let mut s = session();
            let text = reply(m.handle(&mut s, "hola", today()).unwrap());
            assert_eq!(s.current_intent(), Intent::Idle);
            assert_eq!(s.current_step(), Step::Greeting);
            assert!(text.contains("Bienvenido"));
        }

        #[test]
        fn order_keywords_start_selecting() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "hola", today()).unwrap();
            m.handle(&mut s, "quiero pizza", today()).unwrap();
            assert_eq!(s.current_intent(), Intent::Order);
            assert_eq!(s.current_step(), Step::Selecting);
        }

        #[test]
        fn menu_keywords_request_the_menu() {
            let m = machine();
            let mut s = session();
            assert_eq!(m.handle(&mut s, "menu", today()).unwrap(), Directive::ShowMenu);
            assert_eq!(s.current_intent(), Intent::Menu);
            assert_eq!(s.current_step(), Step::Browsing);
        }

        #[test]
        fn unrecognized_text_gets_help_and_stays() {
            let m = machine();
            let mut s = session();
            let text = reply(m.handle(&mut s, "qwerty", today()).unwrap());
            assert!(text.contains("No te entendí"));
            assert_eq!(s.current_step(), Step::Start);
        }

        #[test]
        fn end_keyword_ends_session() {
            let m = machine();
            let mut s = session();
            let directive = m.handle(&mut s, "chau", today()).unwrap();
            assert!(matches!(directive, Directive::End(_)));
            assert_eq!(s.status(), SessionStatus::Ended);
            assert_eq!(s.end_reason(), Some(EndReason::Cancelled));
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn malformed_item_reprompts_without_moving() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            let text = reply(m.handle(&mut s, "una pizza grande por favor", today()).unwrap());
            assert!(text.contains("No pude leer"));
            assert_eq!(s.current_step(), Step::Selecting);
            assert!(s.context().order.is_empty());
        }

        #[test]
        fn out_of_range_quantity_reprompts() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            let directive = m.handle(&mut s, "100 x P1", today()).unwrap();
            assert!(matches!(directive, Directive::Reply(_)));
        }

        #[test]
        fn resolved_item_enters_cart_and_moves_to_confirming() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            let directive = m.handle(&mut s, "2 x P1", today()).unwrap();
            let Directive::ResolveItem(request) = directive else {
                panic!("expected item resolution");
            };
            assert_eq!(request.quantity, 2);

            let text = m.apply_resolved_item(&mut s, Ok(pizza(2))).unwrap();
            assert_eq!(s.current_step(), Step::Confirming);
            assert_eq!(s.context().order.order_total, Money::new(6000, 2));
            assert!(text.contains("S/ 60.00"));
        }

        #[test]
        fn rejected_item_leaves_cart_unchanged() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            m.handle(&mut s, "P1", today()).unwrap();
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            m.handle(&mut s, "agregar", today()).unwrap();
            let before = s.context().order.clone();

            let text = m
                .apply_resolved_item(
                    &mut s,
                    Err(ItemRejection::NotFound {
                        product_id: ProductId::new("ZZ").unwrap(),
                        reference: "ZZ".to_string(),
                    }),
                )
                .unwrap();
            assert!(text.contains("No encontramos"));
            assert_eq!(s.context().order, before);
            assert_eq!(s.current_step(), Step::Selecting);
        }

        #[test]
        fn add_more_returns_to_selecting() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            m.handle(&mut s, "quiero agregar otra", today()).unwrap();
            assert_eq!(s.current_step(), Step::Selecting);
        }

        #[test]
        fn confirming_an_empty_cart_stays_selecting() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            let text = reply(m.handle(&mut s, "listo", today()).unwrap());
            assert!(text.contains("vacío"));
            assert_eq!(s.current_intent(), Intent::Order);
            assert_eq!(s.current_step(), Step::Selecting);
        }

        #[test]
        fn confirm_moves_to_payment() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            let text = reply(m.handle(&mut s, "si", today()).unwrap());
            assert_eq!(s.current_intent(), Intent::Payment);
            assert_eq!(s.current_step(), Step::ProcessingPayment);
            assert!(text.contains("S/ 30.00"));
        }

        #[test]
        fn asking_for_the_menu_again_shows_it_again() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "menu", today()).unwrap();
            assert_eq!(m.handle(&mut s, "ver la carta", today()).unwrap(), Directive::ShowMenu);
            assert_eq!(s.current_intent(), Intent::Menu);
            assert_eq!(s.current_step(), Step::Browsing);
        }

        #[test]
        fn item_typed_while_browsing_menu_is_resolved() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "menu", today()).unwrap();
            let directive = m.handle(&mut s, "P1/grande", today()).unwrap();
            assert!(matches!(directive, Directive::ResolveItem(_)));
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            assert_eq!(s.current_intent(), Intent::Order);
            assert_eq!(s.current_step(), Step::Confirming);
        }
    }

    mod payment_and_delivery {
        use super::*;

        #[test]
        fn unknown_method_reprompts() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            m.handle(&mut s, "si", today()).unwrap();
            m.handle(&mut s, "bitcoin", today()).unwrap();
            assert_eq!(s.current_step(), Step::ProcessingPayment);
            assert_eq!(s.context().payment.payment_method, None);
        }

        #[test]
        fn method_hands_off_to_address_collection() {
            let m = machine();
            let s = at_address_collection(&m);
            assert_eq!(s.current_intent(), Intent::Delivery);
            assert_eq!(s.current_step(), Step::CollectingAddress);
            assert_eq!(s.context().payment.payment_method, Some(PaymentMethod::Yape));
            assert_eq!(s.context().delivery.address_collection_step, AddressStep::Street);
        }

        #[test]
        fn street_named_like_an_end_word_is_an_address() {
            let m = machine();
            let mut s = at_address_collection(&m);
            let directive = m.handle(&mut s, "Jr. Terminar 450", today()).unwrap();
            assert!(matches!(directive, Directive::Reply(_)));
            assert!(s.is_active());
            assert_eq!(s.current_step(), Step::CollectingAddress);
            assert_eq!(s.context().delivery.address_collection_step, AddressStep::City);
        }

        #[test]
        fn completed_address_requests_assembly() {
            let m = machine();
            let mut s = at_address_collection(&m);
            for input in ["Av. Principal 123", "Lima", "Miraflores"] {
                assert!(matches!(m.handle(&mut s, input, today()).unwrap(), Directive::Reply(_)));
            }
            assert_eq!(m.handle(&mut s, "", today()).unwrap(), Directive::AssembleOrder);
            assert_eq!(s.context().delivery.address_collection_step, AddressStep::Complete);
            assert!(s.context().delivery.delivery_address.as_ref().unwrap().is_valid());
        }

        #[test]
        fn delivery_mode_is_asked_when_enabled() {
            let m = machine_with(FlowSettings {
                ask_delivery_mode: true,
                ..FlowSettings::default()
            });
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            m.handle(&mut s, "si", today()).unwrap();
            m.handle(&mut s, "1", today()).unwrap();
            assert_eq!(s.current_step(), Step::ChoosingMode);

            assert_eq!(m.handle(&mut s, "2", today()).unwrap(), Directive::AssembleOrder);
            assert_eq!(s.context().delivery.delivery_type, Some(DeliveryType::Pickup));
        }

        #[test]
        fn scheduled_delivery_collects_date_then_address() {
            let m = machine_with(FlowSettings {
                ask_delivery_mode: true,
                ..FlowSettings::default()
            });
            let mut s = session();
            m.handle(&mut s, "quiero pedir", today()).unwrap();
            m.apply_resolved_item(&mut s, Ok(pizza(1))).unwrap();
            m.handle(&mut s, "si", today()).unwrap();
            m.handle(&mut s, "efectivo", today()).unwrap();
            m.handle(&mut s, "3", today()).unwrap();
            assert_eq!(s.current_step(), Step::CollectingDate);

            m.handle(&mut s, "01/01/2020", today()).unwrap();
            assert_eq!(s.current_step(), Step::CollectingDate);

            m.handle(&mut s, "hoy", today()).unwrap();
            assert_eq!(s.current_step(), Step::CollectingAddress);
            assert_eq!(s.context().delivery.scheduled_for, Some(today()));
        }

        #[test]
        fn complete_order_clears_cart_and_returns_to_idle() {
            let m = machine();
            let mut s = at_address_collection(&m);
            for input in ["Av. Principal 123", "Lima", "Miraflores", ""] {
                m.handle(&mut s, input, today()).unwrap();
            }
            let mut order = Order::new(
                *s.id(),
                s.bot_id().clone(),
                s.user_id().clone(),
                PaymentMethod::Yape,
                s.context().delivery.delivery_info(),
            )
            .add_items(s.context().order.selected_items.clone());
            let order_id = OrderId::new();
            order.id = Some(order_id);

            let text = m.complete_order(&mut s, &order).unwrap();
            assert!(text.contains(&order_id.short_ref()));
            assert_eq!(s.current_intent(), Intent::Idle);
            assert_eq!(s.current_step(), Step::OrderCompleted);
            assert!(s.context().order.is_empty());
            assert_eq!(s.context().order.current_order_id, Some(order_id));
            assert_eq!(s.context().order.order_history, vec![order_id]);
        }
    }

    mod support_flow {
        use super::*;

        #[test]
        fn collects_ticket_and_returns_to_idle() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "necesito ayuda", today()).unwrap();
            assert_eq!(s.current_intent(), Intent::Support);
            assert_eq!(s.current_step(), Step::CollectingIssue);

            m.handle(&mut s, "Mi pedido no llegó", today()).unwrap();
            assert_eq!(s.current_step(), Step::CollectingContact);
            m.handle(&mut s, "999888777", today()).unwrap();
            assert_eq!(s.current_step(), Step::CollectingEmail);
            let text = reply(m.handle(&mut s, "sin correo", today()).unwrap());

            assert!(text.contains("Mi pedido no llegó"));
            assert_eq!(s.current_intent(), Intent::Idle);
            assert_eq!(s.current_step(), Step::SupportCompleted);
        }

        #[test]
        fn free_text_with_keywords_is_still_input() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "soporte", today()).unwrap();
            m.handle(&mut s, "hola, quiero reclamar mi pedido", today()).unwrap();
            assert_eq!(s.current_step(), Step::CollectingContact);
            assert_eq!(
                s.context().support.support_issue.as_deref(),
                Some("hola, quiero reclamar mi pedido")
            );
        }

        #[test]
        fn issue_mentioning_cancel_is_stored_not_ended() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "soporte", today()).unwrap();
            let directive = m.handle(&mut s, "quiero cancelar mi pedido, llegó frío", today()).unwrap();
            assert!(matches!(directive, Directive::Reply(_)));
            assert!(s.is_active());
            assert_eq!(s.current_step(), Step::CollectingContact);
            assert_eq!(
                s.context().support.support_issue.as_deref(),
                Some("quiero cancelar mi pedido, llegó frío")
            );
        }

        #[test]
        fn bare_end_word_still_leaves_support() {
            let m = machine();
            let mut s = session();
            m.handle(&mut s, "soporte", today()).unwrap();
            assert!(matches!(m.handle(&mut s, "salir", today()).unwrap(), Directive::End(_)));
            assert!(!s.is_active());
        }

        #[test]
        fn tickets_are_bounded_by_settings() {
            let m = machine_with(FlowSettings {
                max_support_tickets: 1,
                ..FlowSettings::default()
            });
            let mut s = session();
            for issue in ["Llegó frío", "Cobro doble"] {
                m.handle(&mut s, "soporte", today()).unwrap();
                m.handle(&mut s, issue, today()).unwrap();
                m.handle(&mut s, "999888777", today()).unwrap();
                m.handle(&mut s, "", today()).unwrap();
            }
            let tickets = &s.context().support.tickets;
            assert_eq!(tickets.len(), 1);
            assert!(tickets[0].contains("Cobro doble"));
        }
    }
}
