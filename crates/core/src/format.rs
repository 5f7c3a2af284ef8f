//! Field formatter: raw stored values to Dutch display strings.
//!
//! All functions are total. Input that cannot be interpreted is passed
//! through (trimmed) or becomes an empty string, never an error, because
//! the output lands directly in a legal document.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use time::macros::format_description;
use time::Date;

const MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

// ──────────────────────────────────────────────
// Dates
// ──────────────────────────────────────────────

/// Parse `YYYY-MM-DD` (optionally followed by a time part) or `DD-MM-YYYY`.
pub fn parse_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    let day_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or_default();
    let iso = format_description!("[year]-[month]-[day]");
    let dutch = format_description!("[day]-[month]-[year]");
    Date::parse(day_part, &iso)
        .or_else(|_| Date::parse(day_part, &dutch))
        .ok()
}

/// "15 januari 2020".
pub fn format_date_value(date: Date) -> String {
    let month = MONTHS[usize::from(u8::from(date.month())) - 1];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Long Dutch date from a stored string; unparsable input is returned trimmed.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => format_date_value(d),
        None => raw.trim().to_string(),
    }
}

/// "15-01-2020"; unparsable input is returned trimmed.
pub fn format_date_short(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => format!(
            "{:02}-{:02}-{}",
            d.day(),
            u8::from(d.month()),
            d.year()
        ),
        None => raw.trim().to_string(),
    }
}

// ──────────────────────────────────────────────
// Numbers and money
// ──────────────────────────────────────────────

/// Parse a decimal written either plainly ("1234.56") or the Dutch way
/// ("1.234,56"). Without a comma, dots that group the digits in threes
/// ("1.500", "12.500.000") are thousands separators.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') || is_thousands_grouped(&cleaned) {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    parse_plain(&normalized)
}

fn parse_plain(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
}

/// "1.500" or "-12.500.000": a leading group of one to three digits (not
/// starting with zero) followed by dot-separated groups of exactly three.
fn is_thousands_grouped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut groups = digits.split('.');
    let lead = match groups.next() {
        Some(g) => g,
        None => return false,
    };
    let lead_ok = (1..=3).contains(&lead.len())
        && !lead.starts_with('0')
        && lead.bytes().all(|b| b.is_ascii_digit());
    let mut rest = groups.peekable();
    lead_ok
        && rest.peek().is_some()
        && rest.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Read a decimal from a JSON number or string.
pub fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => parse_plain(&n.to_string()),
        serde_json::Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Format with Dutch separators and a fixed number of decimals:
/// `format_number(1234.5, 2)` is "1.234,50".
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let int_part = abs.trunc();
    let int_digits = int_part
        .to_u128()
        .map(|n| n.to_string())
        .unwrap_or_else(|| int_part.to_string());

    let mut grouped = String::new();
    for (i, ch) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if decimals > 0 {
        let mut frac = (abs - int_part).to_string();
        // "0.5" -> "5"
        if let Some(stripped) = frac.strip_prefix("0.") {
            frac = stripped.to_string();
        } else {
            frac.clear();
        }
        while frac.len() < decimals as usize {
            frac.push('0');
        }
        out.push(',');
        out.push_str(&frac);
    }
    out
}

/// "€ 1.234,56".
pub fn format_money(value: Decimal) -> String {
    format!("€ {}", format_number(value, 2))
}

/// Money from a stored string or number; empty when it does not parse.
pub fn format_amount(raw: &str) -> String {
    parse_decimal(raw).map(format_money).unwrap_or_default()
}

/// Money from a JSON field value; empty when absent or not numeric.
pub fn format_amount_json(value: &serde_json::Value) -> String {
    decimal_from_json(value)
        .map(format_money)
        .unwrap_or_default()
}

// ──────────────────────────────────────────────
// Codes and identifiers
// ──────────────────────────────────────────────

/// "koop_woning" -> "Koop woning". Only the first letter is capitalized.
pub fn humanize_code(code: &str) -> String {
    let spaced = code
        .trim()
        .split(['_', '-'])
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    capitalize_first(&spaced)
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Group a bank account number in blocks of four: "NL91 ABNA 0417 1643 00".
pub fn format_iban(raw: &str) -> String {
    let compact: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cased identifier with collapsed whitespace, e.g. license plates
/// and policy numbers.
pub fn format_identifier(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn parses_iso_and_dutch_dates() {
        assert_eq!(parse_date("2020-01-15"), Some(date!(2020 - 01 - 15)));
        assert_eq!(
            parse_date("2020-01-15T00:00:00"),
            Some(date!(2020 - 01 - 15))
        );
        assert_eq!(parse_date("15-01-2020"), Some(date!(2020 - 01 - 15)));
        assert_eq!(parse_date("gisteren"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn long_date_uses_dutch_month() {
        assert_eq!(format_date("2020-01-15"), "15 januari 2020");
        assert_eq!(format_date("2019-12-01T10:00:00Z"), "1 december 2019");
        assert_eq!(format_date(" onbekend "), "onbekend");
    }

    #[test]
    fn short_date_is_zero_padded() {
        assert_eq!(format_date_short("2020-03-05"), "05-03-2020");
    }

    #[test]
    fn money_uses_dutch_separators() {
        assert_eq!(format_money(Decimal::new(123456, 2)), "€ 1.234,56");
        assert_eq!(format_money(Decimal::new(5, 0)), "€ 5,00");
        assert_eq!(format_money(Decimal::new(1_000_000, 0)), "€ 1.000.000,00");
        assert_eq!(format_money(Decimal::new(-2500, 1)), "€ -250,00");
        assert_eq!(format_money(Decimal::new(1005, 3)), "€ 1,01");
    }

    #[test]
    fn amounts_parse_plain_and_dutch_input() {
        assert_eq!(format_amount("1234.5"), "€ 1.234,50");
        assert_eq!(format_amount("1.234,50"), "€ 1.234,50");
        assert_eq!(format_amount("€ 12"), "€ 12,00");
        assert_eq!(format_amount("veel"), "");
        assert_eq!(format_amount_json(&json!(99.95)), "€ 99,95");
        assert_eq!(format_amount_json(&json!("250")), "€ 250,00");
        assert_eq!(format_amount_json(&json!(null)), "");
    }

    #[test]
    fn dot_grouped_amounts_are_thousands() {
        assert_eq!(format_amount("1.500"), "€ 1.500,00");
        assert_eq!(format_amount("€ 12.500"), "€ 12.500,00");
        assert_eq!(format_amount("12.500.000"), "€ 12.500.000,00");
        assert_eq!(parse_decimal("-1.500"), Some(Decimal::new(-1500, 0)));
        // Not grouped in threes: a plain decimal point.
        assert_eq!(parse_decimal("1.5"), Some(Decimal::new(15, 1)));
        assert_eq!(parse_decimal("0.125"), Some(Decimal::new(125, 3)));
        assert_eq!(parse_decimal("1234.567"), Some(Decimal::new(1234567, 3)));
        // JSON numbers are never regrouped.
        assert_eq!(decimal_from_json(&json!(1.125)), Some(Decimal::new(1125, 3)));
        assert_eq!(format_amount_json(&json!("2.750")), "€ 2.750,00");
    }

    #[test]
    fn number_without_decimals() {
        assert_eq!(format_number(Decimal::new(123456789, 0), 0), "123.456.789");
        assert_eq!(format_number(Decimal::ZERO, 0), "0");
    }

    #[test]
    fn humanizes_snake_case_codes() {
        assert_eq!(humanize_code("koop_woning"), "Koop woning");
        assert_eq!(humanize_code("HYPOTHEEK"), "Hypotheek");
        assert_eq!(humanize_code("studie__schuld"), "Studie schuld");
        assert_eq!(humanize_code(""), "");
    }

    #[test]
    fn iban_grouped_in_fours() {
        assert_eq!(format_iban("NL91ABNA0417164300"), "NL91 ABNA 0417 1643 00");
        assert_eq!(format_iban("nl91 abna 0417 1643 00"), "NL91 ABNA 0417 1643 00");
        assert_eq!(format_iban(""), "");
    }

    #[test]
    fn identifiers_are_upper_cased() {
        assert_eq!(format_identifier(" ab-12  cd "), "AB-12 CD");
    }
}
