//! Field-level parsing for uploaded rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal places kept for reading values
pub const VALUE_DECIMAL_PLACES: u32 = 6;

/// Total significant digits allowed for reading values
pub const VALUE_MAX_DIGITS: u32 = 12;

/// Timestamp layouts carrying an explicit offset
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M%:z"];

/// Timestamp layouts without an offset, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an integer identifier, ignoring surrounding whitespace.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Parse a reading value into a 12-digit, 6-decimal fixed-point number.
///
/// Extra decimal places are rounded away; too many integer digits is an error.
pub fn parse_value(raw: &str) -> Result<Decimal, &'static str> {
    let raw = raw.trim();
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| "not a decimal number")?
        .round_dp(VALUE_DECIMAL_PLACES);

    let limit = Decimal::from(10_i64.pow(VALUE_MAX_DIGITS - VALUE_DECIMAL_PLACES));
    if value.abs() >= limit {
        return Err("more than 12 digits with 6 decimal places");
    }
    Ok(value.normalize())
}

/// Parse a reading timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS[.f]]` with or without an offset,
/// the same with a `T` separator, and a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
