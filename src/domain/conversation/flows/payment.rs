//! Payment selection.

use crate::domain::foundation::Money;
use crate::domain::order::PaymentMethod;
use crate::domain::session::PaymentContext;

use crate::domain::conversation::replies;

/// Menu of methods with the amount due.
pub fn prompt(total: Money, currency_symbol: &str) -> String {
    replies::payment_prompt(total, currency_symbol)
}

/// Stores the method and returns its instructions.
pub fn select(ctx: &mut PaymentContext, method: PaymentMethod, bank_account: &str) -> String {
    ctx.payment_method = Some(method);
    replies::payment_selected(method, &method.instructions(bank_account))
}
