//! Monetary amounts.
//!
//! Amounts are exact decimals; rounding to cents happens only where a value
//! leaves the pricing arithmetic (tax, display).

use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amount in the bot's currency.
pub type Money = Decimal;

/// Rounds an amount to cents, half away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders an amount for chat replies, e.g. `S/ 12.50`.
pub fn format_amount(currency_symbol: &str, amount: Money) -> String {
    format!("{} {:.2}", currency_symbol, round_money(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_amount("S/", Decimal::new(8, 0)), "S/ 8.00");
        assert_eq!(format_amount("$", Decimal::new(1250, 2)), "$ 12.50");
    }
}
