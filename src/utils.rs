use chrono::{DateTime, NaiveDateTime};

use crate::errors::{Error, Result};

/// Layout used for every timestamp the crate writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fallback layouts accepted when reading timestamps back.
const FALLBACK_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Above this magnitude an `f64` carries no cents, so rounding is a no-op.
const NO_FRACTION: f64 = 1e15;

/// Rounds a price to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    if !(value.abs() < NO_FRACTION) {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp written by this crate, or a few common variants of it.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(dt);
    }

    for pattern in FALLBACK_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    Err(Error::InvalidTimestamp(value.to_string()))
}


#[cfg(test)]
mod timestamps {
    use super::*;
    use chrono::NaiveDate;

    fn at_930() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    #[test]
    fn format() {
        assert_eq!("2024-03-08 09:30:00", format_timestamp(&at_930()));
    }

    #[test]
    fn parse_default_and_fallbacks() {
        assert_eq!(at_930(), parse_timestamp("2024-03-08 09:30:00").unwrap());
        assert_eq!(at_930(), parse_timestamp("2024/03/08 09:30:00").unwrap());
        assert_eq!(at_930(), parse_timestamp("2024-03-08T09:30:00").unwrap());
        assert_eq!(at_930(), parse_timestamp("2024-03-08T09:30:00+00:00").unwrap());
    }

    #[test]
    fn parse_garbage() {
        assert!(matches!(parse_timestamp("yesterday"), Err(Error::InvalidTimestamp(s)) if s == "yesterday"));
    }
}
