//! Typed views over the dashboard's resources.
//!
//! Records arrive as loose JSON objects; these structs are what the rest of the crate
//! works with. Decoding is lenient where the backend is known to vary (ids that are
//! numbers or strings, booleans stored as text, date-only timestamps).

pub mod alert;
pub mod fuel;
pub mod report;

pub use alert::*;
pub use fuel::*;
pub use report::*;

/// Lenient timestamp decoding.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parses RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a bare date
    /// (midnight UTC).
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    /// Like [`deserialize`], with `null` and empty strings read as `None`.
    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
            _ => Ok(None),
        }
    }
}

/// Booleans that some tables store as `"true"` / `"false"`.
pub mod flag {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
            Value::Null => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid flag: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(timestamp::parse("2024-02-01"), Some(expected));
        assert_eq!(timestamp::parse("2024-02-01T00:00:00Z"), Some(expected));
        assert_eq!(timestamp::parse("2024-02-01T02:00:00+02:00"), Some(expected));
        assert_eq!(timestamp::parse("2024-02-01T00:00:00"), Some(expected));
        assert_eq!(timestamp::parse("yesterday"), None);
    }
}
