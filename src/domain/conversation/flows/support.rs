//! Support ticket collection: issue, contact, optional email.

use crate::domain::session::{Step, SupportContext};

use super::is_skip;
use crate::domain::conversation::replies;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportOutcome {
    /// Stay on the current step and send this prompt.
    Stay(String),
    /// Move to `Step` and send the prompt.
    Advance(Step, String),
    /// Ticket complete; carries the summary.
    Complete(String),
}

pub fn start(ctx: &mut SupportContext) -> String {
    ctx.begin();
    replies::issue_prompt()
}

/// Feeds one message at `step`. Completed tickets are kept up to `max_tickets`.
pub fn handle_input(
    ctx: &mut SupportContext,
    step: Step,
    text: &str,
    max_tickets: usize,
) -> SupportOutcome {
    let value = text.trim();
    match step {
        Step::CollectingContact => {
            if value.is_empty() {
                return SupportOutcome::Stay(replies::field_required(replies::contact_prompt()));
            }
            ctx.contact = Some(value.to_string());
            SupportOutcome::Advance(Step::CollectingEmail, replies::email_prompt())
        }
        Step::CollectingEmail => {
            ctx.email = (!is_skip(value) && looks_like_email(value)).then(|| value.to_string());
            let summary = replies::support_summary(
                ctx.support_issue.as_deref().unwrap_or_default(),
                ctx.contact.as_deref().unwrap_or_default(),
                ctx.email.as_deref(),
            );
            ctx.record_ticket(summary.clone(), max_tickets);
            SupportOutcome::Complete(summary)
        }
        _ => {
            if value.is_empty() {
                return SupportOutcome::Stay(replies::field_required(replies::issue_prompt()));
            }
            ctx.support_issue = Some(value.to_string());
            SupportOutcome::Advance(Step::CollectingContact, replies::contact_prompt())
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !value.contains(char::is_whitespace)
                && domain.split_once('.').is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
