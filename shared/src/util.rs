use chrono::NaiveDate;
use serde_json::Value;

/// True when `raw` is a finite number once surrounding whitespace is removed.
///
/// Empty strings are not numeric.
pub fn is_numeric_id(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Collapse the backend's boolean encodings into one flag.
///
/// `true`, `"true"`, `1` and `"1"` are true; every other value is false.
pub fn normalize_flag(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Keep only ASCII digits (phone numbers arrive with spaces, dashes, `+91` …)
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Date part of an ISO-8601 timestamp such as `2024-05-01T10:00:00Z`.
pub fn date_part(timestamp: &str) -> Option<NaiveDate> {
    let day = timestamp.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Leading-integer parse of a JSON value: `"90s"` → 90, `12.7` → 12, garbage → 0.
pub fn leading_int(raw: &Value) -> u64 {
    match raw {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}
