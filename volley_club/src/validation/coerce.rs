//! Coercions from untrusted JSON values into typed values.
//!
//! Every function returns `None` when the value cannot be coerced; deciding
//! whether that is an error belongs to the calling rule.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Positive integer identifier from a path segment or query parameter.
pub fn positive_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.trim_start_matches(['+', '-']).bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Integer from a JSON number or a numeric string.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || !s.trim_start_matches(['+', '-']).bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        }
        _ => None,
    }
}

/// Decimal from a JSON number or a numeric string, rounded to cents.
pub fn decimal(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }?;
    Some(parsed.round_dp(2))
}

/// ISO 8601 calendar date. Timestamps contribute their date part.
pub fn date(value: &Value) -> Option<NaiveDate> {
    let Value::String(s) = value else {
        return None;
    };
    let s = s.trim();
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Boolean from `true`/`false`, their string forms, or `1`/`0`.
pub fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Trimmed text. Numbers are accepted and rendered as text.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loose phone format: optional `+`, optional parenthesised area code of up
/// to four digits, then digits and separators (`-`, `.`, `/`, whitespace).
pub fn is_phone(raw: &str) -> bool {
    let mut chars = raw.chars().peekable();

    while chars.peek() == Some(&'+') {
        chars.next();
    }
    if chars.peek() == Some(&'(') {
        chars.next();
    }

    let mut leading_digits = 0;
    while leading_digits < 4 && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        leading_digits += 1;
    }
    if leading_digits == 0 {
        return false;
    }

    if chars.peek() == Some(&')') {
        chars.next();
    }

    chars.all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '.' | '/'))
}

/// Canonical stored form of an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_positive_id() {
        assert_eq!(positive_id("42"), Some(42));
        assert_eq!(positive_id("+7"), Some(7));
        assert_eq!(positive_id("007"), Some(7));
        assert_eq!(positive_id("0"), None);
        assert_eq!(positive_id("-3"), None);
        assert_eq!(positive_id("abc"), None);
        assert_eq!(positive_id("4.5"), None);
        assert_eq!(positive_id(""), None);
        assert_eq!(positive_id(" 4"), None);
    }

    #[test]
    fn test_integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(integer(&json!(12)), Some(12));
        assert_eq!(integer(&json!("12")), Some(12));
        assert_eq!(integer(&json!(" -3 ")), Some(-3));
        assert_eq!(integer(&json!(1.5)), None);
        assert_eq!(integer(&json!("1.5")), None);
        assert_eq!(integer(&json!(true)), None);
    }

    #[test]
    fn test_decimal_rounds_to_cents() {
        assert_eq!(decimal(&json!(150.5)), Decimal::from_str("150.50").ok());
        assert_eq!(decimal(&json!("1.005")), Decimal::from_str("1.00").ok());
        assert_eq!(decimal(&json!("12")), Decimal::from_str("12").ok());
        assert_eq!(decimal(&json!("doce")), None);
        assert_eq!(decimal(&json!(null)), None);
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert_eq!(date(&json!("2025-06-01")), expected);
        assert_eq!(date(&json!("2025-06-01T10:30:00Z")), expected);
        assert_eq!(date(&json!("2025-06-01T10:30:00.000")), expected);
        assert_eq!(date(&json!("2025-02-30")), None);
        assert_eq!(date(&json!("01/06/2025")), None);
        assert_eq!(date(&json!(20250601)), None);
    }

    #[test]
    fn test_boolean_forms() {
        assert_eq!(boolean(&json!(true)), Some(true));
        assert_eq!(boolean(&json!("false")), Some(false));
        assert_eq!(boolean(&json!(1)), Some(true));
        assert_eq!(boolean(&json!("0")), Some(false));
        assert_eq!(boolean(&json!("yes")), None);
        assert_eq!(boolean(&json!(2)), None);
    }

    #[test]
    fn test_text_trims() {
        assert_eq!(text(&json!("  Ana ")), Some("Ana".to_string()));
        assert_eq!(text(&json!(5551234)), Some("5551234".to_string()));
        assert_eq!(text(&json!(["Ana"])), None);
    }

    #[test]
    fn test_phone_formats() {
        assert!(is_phone("5551234567"));
        assert!(!is_phone("+52 (55) 1234-5678"));
        assert!(is_phone("+52 55 1234 5678"));
        assert!(is_phone("(55) 1234-5678"));
        assert!(is_phone("55.1234.5678"));
        assert!(is_phone("555/123/4567"));
        assert!(!is_phone("abc1234567"));
        assert!(!is_phone("555-CALL-NOW"));
        assert!(!is_phone(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana.Diaz@Example.COM "), "ana.diaz@example.com");
    }

    proptest! {
        #[test]
        fn test_positive_id_roundtrips_positive_numbers(id in 1i64..i64::MAX) {
            prop_assert_eq!(positive_id(&id.to_string()), Some(id));
        }

        #[test]
        fn test_positive_id_rejects_non_positive(id in i64::MIN..=0i64) {
            prop_assert_eq!(positive_id(&id.to_string()), None);
        }

        #[test]
        fn test_positive_id_rejects_alphabetic_noise(noise in "[a-zA-Z]{1,8}", id in 1i64..10_000) {
            let raw = format!("{id}{noise}");
            prop_assert_eq!(positive_id(&raw), None);
        }
    }
}
