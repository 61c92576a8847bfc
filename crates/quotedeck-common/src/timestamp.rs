use crate::error::{QuoteError, Result};
use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::Regex;

/// Layout of a timestamp once its fraction has been fixed to microseconds.
const MICROS_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Layout tried when the string carries no recognisable `±HH:MM` suffix.
const PLAIN_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%z";

const MICROS: usize = 6;

lazy_static! {
    /// `<date>T<HH:MM:SS>`, an optional `.<digits>` fraction, then a `±HH:MM` offset.
    static ref TIMESTAMP: Regex =
        Regex::new(r"^(.*T\d{2}:\d{2}:\d{2})(\.\d*)?([+-]\d{2}:\d{2})$").expect("valid regex");
}

/// Rewrite the fractional seconds of `ts` to exactly six digits.
///
/// Longer fractions are truncated (not rounded), shorter ones are zero-padded on the right and a
/// missing (or empty) fraction becomes `.000000`. Returns `None` when `ts` does not have the
/// `<base>[.<fraction>]<offset>` shape at all.
pub fn normalize_fraction(ts: &str) -> Option<String> {
    let caps = TIMESTAMP.captures(ts)?;
    let base = &caps[1];
    let offset = &caps[3];

    let digits = caps
        .get(2)
        .map(|fraction| &fraction.as_str()[1..])
        .unwrap_or("");
    let mut micros: String = digits.chars().take(MICROS).collect();
    while micros.len() < MICROS {
        micros.push('0');
    }

    Some(format!("{base}.{micros}{offset}"))
}

/// Parse a provider timestamp, tolerating any fractional-second precision.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<FixedOffset>> {
    match normalize_fraction(ts) {
        Some(fixed) => DateTime::parse_from_str(&fixed, MICROS_LAYOUT)
            .map_err(|e| QuoteError::Parse(format!("{ts:?}: {e}"))),

        // no `±HH:MM` suffix; let chrono try the remaining forms (`Z`, `+HHMM`)
        None => DateTime::parse_from_rfc3339(ts)
            .or_else(|_| DateTime::parse_from_str(ts, PLAIN_LAYOUT))
            .map_err(|e| QuoteError::Parse(format!("{ts:?}: {e}"))),
    }
}

/// The calendar date (`YYYY-MM-DD`) of a provider timestamp, in the timestamp's own offset.
pub fn trading_day(ts: &str) -> Result<String> {
    let moment = parse_timestamp(ts)?;
    Ok(moment.date_naive().format("%Y-%m-%d").to_string())
}
