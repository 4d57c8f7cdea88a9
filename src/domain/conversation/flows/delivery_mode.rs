//! Delivery-mode configuration: delivery, pickup or a scheduled date.

use chrono::NaiveDate;

use crate::domain::foundation::{normalize_text, ValidationError};
use crate::domain::order::DeliveryType;
use crate::domain::session::DeliveryContext;

use super::address;
use crate::domain::conversation::replies;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Continue with address collection; carries the first address prompt.
    CollectAddress(String),
    /// Ask for the scheduled date.
    CollectDate(String),
    /// Nothing left to collect.
    Pickup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Reprompt(String),
    CollectAddress(String),
}

pub fn prompt() -> String {
    replies::delivery_mode_prompt()
}

/// Stores the chosen mode and says what to collect next.
pub fn select(ctx: &mut DeliveryContext, mode: DeliveryType) -> ModeOutcome {
    ctx.delivery_type = Some(mode);
    ctx.scheduled_for = None;
    match mode {
        DeliveryType::Delivery => ModeOutcome::CollectAddress(address::start(ctx)),
        DeliveryType::Pickup => ModeOutcome::Pickup,
        DeliveryType::ScheduledDelivery => ModeOutcome::CollectDate(replies::date_prompt()),
    }
}

/// Feeds the date answer of a scheduled delivery.
pub fn schedule_input(ctx: &mut DeliveryContext, text: &str, today: NaiveDate) -> ScheduleOutcome {
    match parse_date(text, today) {
        Ok(date) => {
            ctx.scheduled_for = Some(date);
            ScheduleOutcome::CollectAddress(address::start(ctx))
        }
        Err(err) => ScheduleOutcome::Reprompt(replies::invalid_date(&err.to_string())),
    }
}

/// Parses `DD/MM/YYYY`, `today` or `hoy`. Dates before `today` are rejected.
pub fn parse_date(text: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return Err(ValidationError::empty_field("date"));
    }
    if normalized == "hoy" || normalized == "today" {
        return Ok(today);
    }
    let date = NaiveDate::parse_from_str(&normalized, "%d/%m/%Y")
        .map_err(|_| ValidationError::invalid_format("date", "use DD/MM/YYYY"))?;
    if date < today {
        return Err(ValidationError::invalid_format("date", "date is in the past"));
    }
    Ok(date)
}
