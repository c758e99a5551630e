//! Money helpers.
//!
//! Amounts are `rust_decimal::Decimal` end to end. Arithmetic keeps full
//! precision; values are rounded to cents only when they leave the domain.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places used for display and for summaries
pub const CENTS_SCALE: u32 = 2;

/// Smallest magnitude that is still considered money (one cent)
pub fn one_cent() -> Decimal {
    Decimal::new(1, CENTS_SCALE)
}

/// Round to two decimal places, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `value` carries more than two significant decimal places
pub fn exceeds_cent_precision(value: Decimal) -> bool {
    value.normalize().scale() > CENTS_SCALE
}

/// Format an amount for display, e.g. `₹1,234.50` or `-₹33.33`.
pub fn format_money(value: Decimal, currency_symbol: &str) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}{}.{}", sign, currency_symbol, grouped, fraction)
}
