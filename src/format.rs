//! pt-BR display formatting for money, rates, and counters.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Format an amount as pt-BR fixed-point with two decimals: `1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    out.push(',');
    out.push_str(frac_part);
    out
}

/// Format a fractional rate as a percentage with one decimal and a period
/// suffix, e.g. `0.06` → `6.0% ao mês`.
pub fn format_rate(rate: Decimal, period: &str) -> String {
    format!("{:.1}% {period}", rate * dec!(100))
}

/// Compact volume label used on the landing stats: `R$ 1250k`.
pub fn format_volume_k(volume: u64) -> String {
    format!("R$ {}k", (volume + 500) / 1000)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
