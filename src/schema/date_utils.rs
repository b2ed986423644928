//! Parsing of the registry's compact `YYYYMMDD` dates.

use chrono::{Datelike, NaiveDate};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse an 8-digit date with the given `chrono` format
///
/// Anything that is not exactly eight ASCII digits, or that does not name a
/// real calendar day, yields `None`.
#[must_use]
pub fn parse_compact_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, format).ok()
}

/// Convert a date to Arrow `Date32` (days since the Unix epoch)
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert an Arrow `Date32` value back to a date
#[must_use]
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Calendar year of an Arrow `Date32` value
#[must_use]
pub fn year_of_days(days: i32) -> Option<i32> {
    days_to_date(days).map(|d| d.year())
}
