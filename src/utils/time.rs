//! Time utilities for block timestamps
//!
//! Block timestamps arrive in two shapes: the REST API returns TIMESTAMP
//! columns as (possibly exponent-formatted) float seconds since the epoch,
//! while CSV exports use `YYYY-MM-DD HH:MM:SS UTC`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a block timestamp in any of the supported formats
///
/// # Examples
/// ```
/// use token_flow_graph::utils::time::parse_block_timestamp;
/// let a = parse_block_timestamp("1.532704822E9").unwrap();
/// let b = parse_block_timestamp("2018-07-27 15:20:22 UTC").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_block_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(seconds) = raw.parse::<f64>() {
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.trunc() as i64;
        let nanos = ((seconds - seconds.trunc()) * 1e9).round() as u32;
        return Utc.timestamp_opt(whole, nanos.min(999_999_999)).single();
    }

    if let Some(stripped) = raw.strip_suffix(" UTC") {
        if let Ok(naive) = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert Unix timestamp to ISO 8601 date string (YYYY-MM-DD)
///
/// Returns "1970-01-01" for invalid timestamps.
pub fn timestamp_to_iso(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "1970-01-01".to_string())
}
