//! Date-of-introduction parsing.
//!
//! Registry dates are typed by hand and come in several shapes. A date that
//! cannot be parsed never fails the row: it falls back to a fixed value.

use chrono::{Datelike, NaiveDate};

/// Accepted input formats, tried in order
pub const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Fallback for the descriptive layout
pub const FALLBACK_ISO_DATE: &str = "2014-01-01";

/// Fallback for the compact layout
pub const FALLBACK_PACKED_DATE: u32 = 0;

/// Parse a free-text date. Empty or unrecognized input yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().trim_matches('"').trim();
    if cleaned.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cleaned, format).ok())
}

/// `YYYY-MM-DD`, or [`FALLBACK_ISO_DATE`].
pub fn iso_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => FALLBACK_ISO_DATE.to_string(),
    }
}

/// `YYYYMMDD` packed into an integer, or [`FALLBACK_PACKED_DATE`].
pub fn packed_date(date: Option<NaiveDate>) -> u32 {
    match date {
        Some(d) if d.year() > 0 => d.year() as u32 * 10_000 + d.month() * 100 + d.day(),
        _ => FALLBACK_PACKED_DATE,
    }
}

pub fn normalize_iso(raw: &str) -> String {
    iso_date(parse_date(raw))
}

pub fn normalize_packed(raw: &str) -> u32 {
    packed_date(parse_date(raw))
}
