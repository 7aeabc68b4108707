use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::FareharborError;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern is a valid regex"));

/// Mirrors the truthiness FareHarbor consumers have historically relied on: `null`, blank strings, `false`, `0` and
/// empty containers count as "not filled in".
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Pulls an integer out of a loosely typed value.
///
/// Integers pass straight through. Anything else is rendered as text and the first run of digits is used, so
/// `"6 People"` gives 6. If there are no digits, `default` is returned.
pub fn extract_int(value: Option<&Value>, default: i64) -> i64 {
    let text = match value {
        None | Some(Value::Null) | Some(Value::Bool(_)) => return default,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => return i,
            None => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    DIGITS.find(&text).and_then(|m| m.as_str().parse::<i64>().ok()).unwrap_or(default)
}

/// Interprets yes/no style answers. Accepts booleans and strings such as "Yes", "no", "TRUE" in any case.
pub fn is_affirmative(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "yes" | "y" | "true" | "1"),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Converts a FareHarbor money field into integer cents.
///
/// FareHarbor sends these either as numbers or as display strings like `"$1,250.00"`. Missing values are zero.
pub fn parse_amount_cents(value: Option<&Value>) -> Result<i64, FareharborError> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => {
            let cents = n
                .as_f64()
                .map(|amount| (amount * 100.0).round())
                .filter(|cents| cents.is_finite() && cents.abs() < i64::MAX as f64)
                .ok_or_else(|| FareharborError::InvalidCurrencyAmount(n.to_string()))?;
            #[allow(clippy::cast_possible_truncation)]
            Ok(cents as i64)
        },
        Some(Value::String(s)) => parse_display_amount(s),
        Some(other) => Err(FareharborError::InvalidCurrencyAmount(other.to_string())),
    }
}

fn parse_display_amount(display: &str) -> Result<i64, FareharborError> {
    let cleaned = display.trim().replace(['$', ',', ' '], "");
    if cleaned.is_empty() {
        return Ok(0);
    }
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let invalid = |reason: &str| FareharborError::InvalidCurrencyAmount(format!("{display}. {reason}"));
    let mut parts = digits.split('.');
    let whole = match parts.next() {
        Some("") => 0,
        Some(w) => w.parse::<i64>().map_err(|e| invalid(&e.to_string()))?,
        None => 0,
    };
    let cents = match parts.next() {
        None | Some("") => 0,
        Some(c) if c.len() == 1 => c.parse::<i64>().map_err(|e| invalid(&e.to_string()))? * 10,
        Some(c) if c.len() == 2 => c.parse::<i64>().map_err(|e| invalid(&e.to_string()))?,
        Some(_) => return Err(invalid("Too many decimal places")),
    };
    if parts.next().is_some() {
        return Err(invalid("More than one decimal point"));
    }
    let total =
        whole.checked_mul(100).and_then(|w| w.checked_add(cents)).ok_or_else(|| invalid("Amount is too large"))?;
    Ok(if negative { -total } else { total })
}

/// Parses FareHarbor timestamps, which carry a UTC offset with or without a colon (`-0400` or `-04:00`).
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, FareharborError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|e| FareharborError::InvalidTimestamp(format!("{s}. {e}")))
}
