//! Address collection: street, city, district, optional postal code.
//!
//! Each step stores one field and asks for the next. Required fields only
//! need to be non-empty at their own step; the full completeness rule runs
//! once all fields are in, and a failure restarts from the street.

use crate::domain::order::DeliveryAddress;
use crate::domain::session::{AddressStep, DeliveryContext};

use crate::domain::conversation::replies;
use super::is_skip;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressOutcome {
    /// Stay in the flow and send this prompt.
    Prompt(String),
    /// All fields collected and valid.
    Complete(DeliveryAddress),
}

/// Resets the flow and returns the first prompt.
pub fn start(ctx: &mut DeliveryContext) -> String {
    ctx.begin_address();
    replies::street_prompt()
}

/// Prompt for the step the flow is waiting on.
pub fn current_prompt(step: AddressStep) -> String {
    match step {
        AddressStep::Street | AddressStep::Complete => replies::street_prompt(),
        AddressStep::City => replies::city_prompt(),
        AddressStep::District => replies::district_prompt(),
        AddressStep::PostalCode => replies::postal_code_prompt(),
    }
}

/// Feeds one message into the flow.
pub fn handle_input(ctx: &mut DeliveryContext, text: &str) -> AddressOutcome {
    let value = text.trim();
    match ctx.address_collection_step {
        AddressStep::Street | AddressStep::Complete => {
            if ctx.address_collection_step == AddressStep::Complete {
                ctx.begin_address();
            }
            required(ctx, value, AddressStep::City, |ctx, v| ctx.draft.street = Some(v))
        }
        AddressStep::City => {
            required(ctx, value, AddressStep::District, |ctx, v| ctx.draft.city = Some(v))
        }
        AddressStep::District => required(ctx, value, AddressStep::PostalCode, |ctx, v| {
            ctx.draft.district = Some(v)
        }),
        AddressStep::PostalCode => {
            ctx.draft.postal_code = (!is_skip(value)).then(|| value.to_string());
            finish(ctx)
        }
    }
}

fn required(
    ctx: &mut DeliveryContext,
    value: &str,
    next: AddressStep,
    store: impl FnOnce(&mut DeliveryContext, String),
) -> AddressOutcome {
    if value.is_empty() {
        return AddressOutcome::Prompt(replies::field_required(current_prompt(
            ctx.address_collection_step,
        )));
    }
    store(ctx, value.to_string());
    ctx.address_collection_step = next;
    AddressOutcome::Prompt(current_prompt(next))
}

fn finish(ctx: &mut DeliveryContext) -> AddressOutcome {
    let address = ctx.draft.to_address();
    match address.validate() {
        Ok(()) => {
            ctx.address_collection_step = AddressStep::Complete;
            ctx.delivery_address = Some(address.clone());
            AddressOutcome::Complete(address)
        }
        Err(err) => {
            ctx.begin_address();
            AddressOutcome::Prompt(replies::address_invalid(&err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(ctx: &mut DeliveryContext, inputs: &[&str]) -> AddressOutcome {
        let mut last = AddressOutcome::Prompt(String::new());
        for input in inputs {
            last = handle_input(ctx, input);
        }
        last
    }

    #[test]
    fn collects_fields_in_order() {
        let mut ctx = DeliveryContext::default();
        start(&mut ctx);

        assert_eq!(
            handle_input(&mut ctx, "Av. Principal 123"),
            AddressOutcome::Prompt(replies::city_prompt())
        );
        assert_eq!(ctx.address_collection_step, AddressStep::City);
        assert_eq!(
            handle_input(&mut ctx, "Lima"),
            AddressOutcome::Prompt(replies::district_prompt())
        );
        assert_eq!(
            handle_input(&mut ctx, "Miraflores"),
            AddressOutcome::Prompt(replies::postal_code_prompt())
        );

        match handle_input(&mut ctx, "") {
            AddressOutcome::Complete(address) => {
                assert_eq!(address.street, "Av. Principal 123");
                assert_eq!(address.city, "Lima");
                assert_eq!(address.district, "Miraflores");
                assert_eq!(address.postal_code, None);
                assert!(address.is_valid());
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(ctx.address_collection_step, AddressStep::Complete);
        assert!(ctx.delivery_address.is_some());
    }

    #[test]
    fn keeps_postal_code_when_given() {
        let mut ctx = DeliveryContext::default();
        start(&mut ctx);
        let outcome = feed(&mut ctx, &["Av. Principal 123", "Lima", "Miraflores", "15074"]);
        match outcome {
            AddressOutcome::Complete(address) => {
                assert_eq!(address.postal_code.as_deref(), Some("15074"))
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn empty_required_field_reprompts_without_advancing() {
        let mut ctx = DeliveryContext::default();
        start(&mut ctx);
        handle_input(&mut ctx, "Av. Principal 123");
        let outcome = handle_input(&mut ctx, "   ");
        assert!(matches!(outcome, AddressOutcome::Prompt(ref p) if p.contains("obligatorio")));
        assert_eq!(ctx.address_collection_step, AddressStep::City);
        assert_eq!(ctx.draft.city, None);
    }

    #[test]
    fn invalid_address_restarts_from_street() {
        let mut ctx = DeliveryContext::default();
        start(&mut ctx);
        let outcome = feed(&mut ctx, &["Av 1", "Lima", "Miraflores", "no"]);
        assert!(matches!(outcome, AddressOutcome::Prompt(ref p) if p.contains("no es válida")));
        assert_eq!(ctx.address_collection_step, AddressStep::Street);
        assert_eq!(ctx.draft.street, None);
        assert!(ctx.delivery_address.is_none());
    }

    #[test]
    fn input_after_completion_starts_a_new_address() {
        let mut ctx = DeliveryContext::default();
        start(&mut ctx);
        feed(&mut ctx, &["Av. Principal 123", "Lima", "Miraflores", ""]);
        handle_input(&mut ctx, "Jr. Las Flores 456");
        assert_eq!(ctx.address_collection_step, AddressStep::City);
        assert_eq!(ctx.draft.street.as_deref(), Some("Jr. Las Flores 456"));
    }
}
