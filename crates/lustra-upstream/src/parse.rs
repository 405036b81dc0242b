//! Low-level string parsing for upstream free-text fields.
//!
//! These functions use manual scanning rather than a regex dependency. See
//! [`crate::normalize`] for how they compose into product normalization.

/// Extracts an integer stock count from a free-text stock field.
///
/// Rules, in order (case-insensitive):
/// 1. Negated availability («нет в наличии», «под заказ», "out of stock")
///    → `0`, even when a number is present elsewhere in the string.
/// 2. First run of digits («5 шт», `"12"`) → that number.
/// 3. Bare availability words («в наличии», "in stock") → `1`.
/// 4. Anything else → `0`.
pub(crate) fn parse_stock_count(raw: &str) -> i64 {
    const NEGATIVE: [&str; 5] = ["нет", "отсутств", "под заказ", "out of stock", "ожидается"];
    const POSITIVE: [&str; 4] = ["в наличии", "есть", "много", "in stock"];

    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return 0;
    }
    if NEGATIVE.iter().any(|marker| lower.contains(marker)) {
        return 0;
    }
    if let Some(count) = first_integer(&lower) {
        return count;
    }
    if POSITIVE.iter().any(|marker| lower.contains(marker)) {
        return 1;
    }
    0
}

/// Parses a price from a numeric string, tolerating thousands spacing,
/// decimal commas, and a trailing currency marker («5 400,00 ₽»).
pub(crate) fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// First run of consecutive ASCII digits, parsed as `i64`. Runs too long to
/// fit are treated as absent.
fn first_integer(s: &str) -> Option<i64> {
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok()
}
