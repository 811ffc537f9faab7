//! Parsing and interactive validation of operator-typed text
//!
//! Quantities, prices and the coefficient are kept as the text the operator
//! typed. Everything here is lenient: unparsable text becomes a neutral value
//! instead of an error so that totals can always be computed.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Accepts both `.` and `,` as the decimal separator
pub fn normalize_separator(text: &str) -> String {
    text.replace(',', ".")
}

/// Whether `text` may be committed into a quantity or price field.
///
/// Empty text is acceptable (the operator cleared the field). Otherwise only
/// digits and at most one separator are allowed. A dangling separator such
/// as `"5."` is accepted because it is a valid intermediate state while typing.
pub fn is_numeric_input(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let normalized = normalize_separator(text);
    let mut parts = normalized.split('.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();
    if parts.next().is_some() {
        return false;
    }
    integer.chars().all(|c| c.is_ascii_digit())
        && fraction.map_or(true, |f| f.chars().all(|c| c.is_ascii_digit()))
}

/// Parse a non-negative decimal, `None` when the text holds no number
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if !is_numeric_input(trimmed) || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let normalized = normalize_separator(trimmed);
    let (integer, fraction) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));
    let integer = if integer.is_empty() { "0" } else { integer };
    let canonical = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    };
    Decimal::from_str(&canonical).ok()
}

/// Quantity or price value; malformed or empty text counts as zero
pub fn parse_amount(text: &str) -> Decimal {
    parse_decimal(text).unwrap_or(Decimal::ZERO)
}

/// Coefficient value; malformed or empty text counts as one
pub fn parse_coefficient(text: &str) -> Decimal {
    parse_decimal(text).unwrap_or(Decimal::ONE)
}

/// Money rounding: two places, halves away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `round(quantity * unit_price, 2)` with zero for anything unparsable
pub fn line_total(quantity: &str, unit_price: &str) -> Decimal {
    parse_amount(quantity)
        .checked_mul(parse_amount(unit_price))
        .map(round_money)
        .unwrap_or(Decimal::ZERO)
}

/// Format money with exactly two decimals
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// Re-format a date field while it is being typed.
///
/// Existing dots are ignored and re-inserted after the day and month, so
/// `"0104"` becomes `"01.04"` and `"01042025"` becomes `"01.04.2025"`.
/// Returns `None` when the text contains anything but digits and dots or
/// more than eight digits.
pub fn format_date_input(text: &str) -> Option<String> {
    if !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.len() > 8 {
        return None;
    }

    let mut formatted = String::with_capacity(10);
    for (i, c) in digits.chars().enumerate() {
        if i == 2 || i == 4 {
            formatted.push('.');
        }
        formatted.push(c);
    }
    Some(formatted)
}

/// Parse a complete `dd.mm.yyyy` date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d.%m.%Y").ok()
}

/// Phone numbers are `+` followed by digits, twelve characters at most
pub fn is_phone_input(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let Some(rest) = text.strip_prefix('+') else {
        return false;
    };
    text.chars().count() <= 12 && rest.chars().all(|c| c.is_ascii_digit())
}
