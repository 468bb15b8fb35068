//! Soft parsing of user-entered values.
//!
//! Journal entries arrive as free text from forms, so numbers may carry a
//! decimal comma or a unit suffix and timestamps may or may not carry a time.
//! Anything that does not parse becomes `None`; nothing here returns an error
//! except `parse_date_key`, which validates caller-supplied keys.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::EngineError;

/// Leading number, optional decimal comma, optional unit suffix.
static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d+(?:[.,]\d+)?)\s*(?:[\p{L}%°µ][\p{L}\d/%°µ.]*)?$").unwrap()
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a user-entered number.
/// Handles: "5.8", "5,8", "5.8 mmol/L", "6.5%", "120mmHg"
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let caps = RE_NUMBER.captures(trimmed)?;
    let value = caps.get(1)?.as_str().replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a record timestamp. Date-only values map to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        // Wall-clock time as written; the day boundary is the caller's local date.
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Calendar date of a record timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}

/// `YYYY-MM-DD` key used for per-day lookups.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Validate a caller-supplied `YYYY-MM-DD` key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(key.to_string()))
}

/// serde helper: number or numeric string, anything else is `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_number(&s),
        _ => None,
    })
}

/// serde helper: text field, anything that is not a string becomes empty.
/// An empty timestamp never parses, so the record is skipped by every lookup.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

/// serde helper: optional text, blank or non-string is `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(lenient_string(deserializer)?).filter(|s| !s.trim().is_empty()))
}

/// serde helper: record id, malformed ids are `None`.
pub fn lenient_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Uuid::parse_str(s.trim()).ok(),
        _ => None,
    })
}

/// serde helper: known enum key, anything else is `None`.
pub fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().parse::<T>().ok(),
        _ => None,
    })
}

/// serde helper: known enum key, falling back to the type's default.
pub fn lenient_enum_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    Ok(lenient_enum(deserializer)?.unwrap_or_default())
}

/// serde helper: list of enum keys, unknown keys dropped.
pub fn lenient_enum_seq<'de, D, T, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    C: FromIterator<T>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => s.trim().parse::<T>().ok(),
            _ => None,
        })
        .collect())
}

/// serde helper: booleans entered as checkboxes or "yes"/"no" text.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "on"
        ),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn parse_number_variants() {
        assert_eq!(parse_number("5.8"), Some(5.8));
        assert_eq!(parse_number(" 5,8 "), Some(5.8));
        assert_eq!(parse_number("5.8 mmol/L"), Some(5.8));
        assert_eq!(parse_number("6.5%"), Some(6.5));
        assert_eq!(parse_number("120mmHg"), Some(120.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
    }

    #[test]
    fn parse_number_rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("high"), None);
        assert_eq!(parse_number("5.8.3"), None);
        assert_eq!(parse_number("ca. 5"), None);
    }

    #[test]
    fn parse_timestamp_date_only_is_midnight() {
        let dt = parse_timestamp("2026-03-14").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(dt.time(), NaiveTime::MIN);
    }

    #[test]
    fn parse_timestamp_with_time() {
        let a = parse_timestamp("2026-03-14T08:30").unwrap();
        let b = parse_timestamp("2026-03-14 08:30:00").unwrap();
        assert_eq!(a, b);
        let c = parse_timestamp("2026-03-14T08:30:00+02:00").unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2026-13-01").is_none());
    }

    #[test]
    fn date_key_round_trip() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(date_key(d), "2026-01-05");
        assert_eq!(parse_date_key("2026-01-05").unwrap(), d);
        assert!(matches!(
            parse_date_key("05/01/2026"),
            Err(EngineError::InvalidDate(_))
        ));
    }

    #[derive(Deserialize)]
    struct ValueFields {
        #[serde(default, deserialize_with = "lenient_number")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "lenient_flag")]
        flag: bool,
    }

    #[test]
    fn lenient_number_accepts_numbers_and_text() {
        let p: ValueFields = serde_json::from_str(r#"{"value": 4.2}"#).unwrap();
        assert_eq!(p.value, Some(4.2));
        let p: ValueFields = serde_json::from_str(r#"{"value": "4,2"}"#).unwrap();
        assert_eq!(p.value, Some(4.2));
        let p: ValueFields = serde_json::from_str(r#"{"value": "n/a"}"#).unwrap();
        assert_eq!(p.value, None);
        let p: ValueFields = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(p.value, None);
        let p: ValueFields = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.value, None);
    }

    #[derive(Deserialize)]
    struct TextFields {
        #[serde(default, deserialize_with = "lenient_string")]
        date: String,
        #[serde(default, deserialize_with = "lenient_text")]
        note: Option<String>,
        #[serde(default, deserialize_with = "lenient_uuid")]
        id: Option<Uuid>,
    }

    #[test]
    fn lenient_text_fields() {
        let t: TextFields = serde_json::from_str(r#"{"date": 20261001, "note": "  ", "id": "x"}"#)
            .unwrap();
        assert_eq!(t.date, "");
        assert_eq!(t.note, None);
        assert_eq!(t.id, None);

        let t: TextFields = serde_json::from_str(
            r#"{
                "date": "2026-10-01",
                "note": "after walk",
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8"
            }"#,
        )
        .unwrap();
        assert_eq!(t.date, "2026-10-01");
        assert_eq!(t.note.as_deref(), Some("after walk"));
        assert!(t.id.is_some());

        let t: TextFields = serde_json::from_str("{}").unwrap();
        assert_eq!(t.date, "");
    }

    #[derive(Deserialize)]
    struct EnumFields {
        #[serde(default, deserialize_with = "lenient_enum_seq")]
        programs: Vec<crate::models::enums::Program>,
        #[serde(default, deserialize_with = "lenient_enum_or_default")]
        active: crate::models::enums::Program,
    }

    #[test]
    fn lenient_enum_seq_drops_unknown_keys() {
        use crate::models::enums::Program;
        let p: EnumFields =
            serde_json::from_str(r#"{"programs": ["stone", "cardio", 3, "dialysis"]}"#).unwrap();
        assert_eq!(p.programs, vec![Program::Stone, Program::Dialysis]);
        assert_eq!(p.active, Program::Kidney);
        let p: EnumFields = serde_json::from_str(r#"{"active": "pediatric"}"#).unwrap();
        assert_eq!(p.active, Program::Pediatric);
        let p: EnumFields = serde_json::from_str(r#"{"active": "unknown"}"#).unwrap();
        assert_eq!(p.active, Program::Kidney);
    }

    #[test]
    fn lenient_flag_accepts_text() {
        let p: ValueFields = serde_json::from_str(r#"{"flag": "yes"}"#).unwrap();
        assert!(p.flag);
        let p: ValueFields = serde_json::from_str(r#"{"flag": 0}"#).unwrap();
        assert!(!p.flag);
        let p: ValueFields = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!p.flag);
    }
}
