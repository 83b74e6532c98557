//! Tolerant parsing of monetary amounts.
//!
//! The persisted snapshots and user-facing forms both feed free-text numbers
//! into the store: plain integers, floats, strings with `.` or `,` used as
//! either thousands or decimal separators, currency decorations, or garbage.
//! This is the single parsing routine shared by every entry point; amounts
//! are integers in the smallest currency unit (VND has no subunit).

use serde_json::Value;

/// Coerces an arbitrary JSON value to a finite integer amount.
///
/// Numbers are rounded to the nearest integer; strings go through
/// [`parse_amount_str`]; anything else yields `fallback`.
pub fn coerce_amount(value: &Value, fallback: i64) -> i64 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f.abs() < i64::MAX as f64 {
                    f.round() as i64
                } else {
                    fallback
                }
            } else {
                fallback
            }
        }
        Value::String(s) => parse_amount_str(s).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Parses a free-text amount into an integer, or `None` when the input is
/// not recognizably numeric.
///
/// Separator disambiguation, locale-agnostic:
/// - both `.` and `,` present: the one occurring last is the decimal
///   separator, the other marks thousands;
/// - a single separator kind occurring more than once marks thousands;
/// - a single occurrence followed by exactly three digits marks thousands
///   (`"50.000"` is fifty thousand, not fifty), otherwise it is decimal.
///
/// Fractional parts are rounded half-up; the currency has no subunit.
pub fn parse_amount_str(raw: &str) -> Option<i64> {
    let mut s: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '₫' && *c != 'đ' && *c != '$')
        .collect();
    for marker in ["VND", "vnd"] {
        s = s.replace(marker, "");
    }
    if s.is_empty() {
        return None;
    }

    let negative = s.starts_with('-');
    if s.starts_with('-') || s.starts_with('+') {
        s.remove(0);
    }
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let (int_digits, frac_digits) = split_separators(&s)?;
    let mut amount = int_digits.parse::<i64>().ok()?;

    // Round half-up on the first fractional digit.
    if let Some(first) = frac_digits.chars().next() {
        if !first.is_ascii_digit() {
            return None;
        }
        if !frac_digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if first.to_digit(10).unwrap_or(0) >= 5 {
            amount = amount.checked_add(1)?;
        }
    }

    Some(if negative { -amount } else { amount })
}

/// Splits a digits-and-separators string into integer and fractional digit
/// runs, resolving which separator (if any) is decimal.
fn split_separators(s: &str) -> Option<(String, String)> {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');

    let decimal_pos = match (last_dot, last_comma) {
        (Some(d), Some(c)) => Some(if d > c { d } else { c }),
        (Some(pos), None) => single_separator_decimal(s, '.', pos),
        (None, Some(pos)) => single_separator_decimal(s, ',', pos),
        (None, None) => None,
    };

    let (int_part, frac_part) = match decimal_pos {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    };

    // The integer part may carry thousands grouping, but only with a single
    // separator kind, and never the one already chosen as decimal.
    if let Some(pos) = decimal_pos {
        let decimal_sep = s[pos..].chars().next().unwrap_or('.');
        if int_part.contains(decimal_sep) {
            return None;
        }
        if int_part.contains('.') && int_part.contains(',') {
            return None;
        }
    }

    let int_digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    let int_digits = if int_digits.is_empty() {
        "0".to_string()
    } else {
        int_digits
    };
    // A separator inside the fractional part means the input was not a number.
    if frac_part.contains('.') || frac_part.contains(',') {
        return None;
    }
    Some((int_digits, frac_part.to_string()))
}

/// For a string with exactly one kind of separator, decides whether the
/// occurrence at `pos` is decimal. Repeated occurrences are thousands
/// grouping; a single occurrence with a three-digit tail is thousands too.
fn single_separator_decimal(s: &str, sep: char, pos: usize) -> Option<usize> {
    if s.matches(sep).count() > 1 {
        return None;
    }
    let tail = &s[pos + 1..];
    if tail.len() == 3 && tail.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(pos)
    }
}
