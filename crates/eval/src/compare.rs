//! Scalar coercion and comparison for condition evaluation.
//!
//! Booleans accept Dutch and English synonyms and numbers may arrive as
//! text. Text compares case-insensitively after trimming. All numbers are
//! `Decimal`.

use std::cmp::Ordering;

use convenant_core::format::{parse_date, parse_decimal};
use convenant_core::Value;
use rust_decimal::Decimal;

const TRUE_WORDS: [&str; 5] = ["true", "ja", "yes", "j", "1"];
const FALSE_WORDS: [&str; 5] = ["false", "nee", "no", "n", "0"];

/// Boolean reading of a value, if it has one.
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) if *n == Decimal::ONE => Some(true),
        Value::Number(n) if n.is_zero() => Some(false),
        Value::Text(s) => {
            let word = s.trim().to_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Some(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Numeric reading of a value: numbers, and text that parses as a decimal.
pub fn as_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => parse_decimal(s),
        _ => None,
    }
}

/// Trimmed, lower-cased text for string comparison.
pub fn normalized_text(value: &Value) -> String {
    value.as_text().trim().to_lowercase()
}

/// Whether a value counts as empty: null or blank text.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Equality under the lenient rules: null equals only null; a boolean on
/// either side compares as booleans; two numeric readings compare as
/// numbers; anything else compares as normalized text.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => match (as_bool(left), as_bool(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => match (as_number(left), as_number(right)) {
            (Some(a), Some(b)) => a == b,
            _ => normalized_text(left) == normalized_text(right),
        },
    }
}

/// Ordering for `>`, `>=`, `<`, `<=`: numeric when both sides are numbers,
/// chronological when both are dates, otherwise unordered.
pub fn compare_ordered(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return Some(a.cmp(&b));
    }
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => match (parse_date(a), parse_date(b)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        },
        _ => None,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_synonyms() {
        assert_eq!(as_bool(&Value::from("Ja")), Some(true));
        assert_eq!(as_bool(&Value::from(" nee ")), Some(false));
        assert_eq!(as_bool(&Value::from(1i64)), Some(true));
        assert_eq!(as_bool(&Value::from(0i64)), Some(false));
        assert_eq!(as_bool(&Value::from(2i64)), None);
        assert_eq!(as_bool(&Value::from("misschien")), None);
        assert!(values_equal(&Value::Bool(true), &Value::from("ja")));
        assert!(!values_equal(&Value::Bool(false), &Value::from("yes")));
        assert!(!values_equal(&Value::Bool(true), &Value::from("misschien")));
    }

    #[test]
    fn numbers_compare_numerically() {
        assert!(values_equal(&Value::from(2i64), &Value::from("2.0")));
        assert!(values_equal(&Value::from("1.500,00"), &Value::from(1500i64)));
        assert_eq!(
            compare_ordered(&Value::from(10i64), &Value::from("9")),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn text_compares_case_insensitively() {
        assert!(values_equal(&Value::from(" Utrecht"), &Value::from("utrecht ")));
        assert!(!values_equal(&Value::from("Utrecht"), &Value::from("Zwolle")));
    }

    #[test]
    fn null_only_equals_null() {
        assert!(values_equal(&Value::Null, &Value::Null));
        assert!(!values_equal(&Value::Null, &Value::from("")));
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&Value::from("  ")));
        assert!(!is_empty(&Value::from(0i64)));
    }

    #[test]
    fn dates_order_chronologically() {
        assert_eq!(
            compare_ordered(&Value::from("2020-01-15"), &Value::from("15-02-2020")),
            Some(Ordering::Less)
        );
        assert_eq!(compare_ordered(&Value::from("abc"), &Value::from("def")), None);
        assert_eq!(compare_ordered(&Value::Null, &Value::from(1i64)), None);
    }
}
