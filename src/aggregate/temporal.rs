//! Year-based aggregations: timelines, decade buckets and slider bounds.

use chrono::{Datelike, Local};

use crate::config::MIN_VALID_YEAR;
use crate::error::Result;
use crate::table::EstablishmentTable;

use super::{ValueCount, count_in_order};

/// The current calendar year in local time
#[must_use]
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Establishments per year, ascending, for years up to the current year
pub fn timeline(table: &EstablishmentTable, column: &str) -> Result<Vec<ValueCount<i32>>> {
    timeline_until(table, column, current_year())
}

/// Establishments per year in `MIN_VALID_YEAR..=max_year`, ascending
///
/// Missing years and years outside the window are excluded.
pub fn timeline_until(
    table: &EstablishmentTable,
    column: &str,
    max_year: i32,
) -> Result<Vec<ValueCount<i32>>> {
    let years = table.years(column)?;
    let mut counts = count_in_order(
        years
            .iter()
            .flatten()
            .filter(|year| (MIN_VALID_YEAR..=max_year).contains(year)),
    );
    counts.sort_unstable_by_key(|vc| vc.value);
    Ok(counts)
}

/// Establishments per decade, ascending by decade start
///
/// Every non-missing year counts, with no window applied. Years too small
/// for their decade start to fit an `i32` are skipped.
pub fn decade_distribution(
    table: &EstablishmentTable,
    column: &str,
) -> Result<Vec<ValueCount<i32>>> {
    let years = table.years(column)?;
    let mut counts = count_in_order(years.iter().flatten().filter_map(decade_of));
    counts.sort_unstable_by_key(|vc| vc.value);
    Ok(counts)
}

/// First year of the decade holding `year`
///
/// `None` for years whose decade start is not representable.
#[must_use]
pub fn decade_of(year: i32) -> Option<i32> {
    year.div_euclid(10).checked_mul(10)
}

/// Display label for a decade start, e.g. `2010s`
#[must_use]
pub fn decade_label(decade: i32) -> String {
    format!("{decade}s")
}

/// Smallest and largest year of `column` within `MIN_VALID_YEAR..=max_year`
///
/// `None` when no year falls inside the window.
pub fn available_year_range(
    table: &EstablishmentTable,
    column: &str,
    max_year: i32,
) -> Result<Option<(i32, i32)>> {
    let years = table.years(column)?;
    let range = years
        .iter()
        .flatten()
        .filter(|year| (MIN_VALID_YEAR..=max_year).contains(year))
        .fold(None, |acc: Option<(i32, i32)>, year| match acc {
            None => Some((year, year)),
            Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
        });
    Ok(range)
}
