use rust_decimal::Decimal;
use std::str::FromStr;
use tabula_core::Money;

const CURRENCY_MARKS: &[char] = &['€', '$', '£', '¥', '₹', '\''];

/// Parse a locale-formatted amount into signed minor units.
///
/// Accepts German (`1.234,56`) and English (`1,234.56`) separators, currency
/// symbols or codes, and three negative conventions: `(1.234,56)`,
/// `-1.234,56` and `1.234,56-`. Anything unparseable yields `0` so a single
/// bad cell never aborts an import.
pub fn parse_amount(text: &str) -> i64 {
    let cleaned: String = text
        .trim()
        .chars()
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .filter(|c| !c.is_whitespace() && !c.is_alphabetic() && !CURRENCY_MARKS.contains(c))
        .collect();

    let (negative, body) = split_sign(&cleaned);
    let Some(value) = to_decimal(body) else {
        return 0;
    };

    let cents = Money::from_decimal(value).to_cents().unwrap_or(0);
    if negative {
        -cents
    } else {
        cents
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return (true, inner);
    }
    if let Some(rest) = s.strip_prefix('-') {
        return (true, rest);
    }
    if let Some(rest) = s.strip_suffix('-') {
        return (true, rest);
    }
    (false, s.strip_prefix('+').unwrap_or(s))
}

fn to_decimal(digits: &str) -> Option<Decimal> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }
    let normalized = match (digits.rfind(','), digits.rfind('.')) {
        // German: dots group thousands, comma is the decimal point.
        (Some(comma), Some(dot)) if comma > dot => digits.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => digits.replace(',', ""),
        // Several commas and no dot can only be English thousands grouping.
        (Some(_), None) if digits.matches(',').count() > 1 => digits.replace(',', ""),
        (Some(_), None) => digits.replace(',', "."),
        (None, _) => digits.to_string(),
    };
    Decimal::from_str(&normalized).ok()
}
