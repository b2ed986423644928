//! Aggregations over a (filtered) establishment table.
//!
//! Every function is pure and total: an empty table yields zero counts or an
//! empty result, never an error. Errors only come from a missing column.

pub mod ranking;
pub mod summary;
pub mod temporal;

use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::Result;
use crate::table::EstablishmentTable;
use crate::utils::arrow::non_null_values;

pub use ranking::{
    RankedActivity, distribution, status_distribution, top_activities,
    top_activities_with_descriptions, top_municipalities, top_values, type_distribution,
};
pub use summary::{SummaryStats, summary_stats};
pub use temporal::{
    available_year_range, current_year, decade_distribution, decade_label, decade_of, timeline,
    timeline_until,
};

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount<K> {
    /// Grouping value
    pub value: K,
    /// Number of records holding it
    pub count: usize,
}

impl<K> ValueCount<K> {
    /// Share of `total`, in percent
    #[must_use]
    pub fn share_of(&self, total: usize) -> f64 {
        percentage(self.count, total)
    }
}

/// `count / total * 100`, rounded to 2 decimals; 0 when `total` is 0
#[must_use]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let share = count as f64 / total as f64 * 100.0;
    (share * 100.0).round() / 100.0
}

/// Count occurrences, keeping first-occurrence order of distinct values
pub(crate) fn count_in_order<K, I>(values: I) -> Vec<ValueCount<K>>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: FxHashMap<K, usize> = FxHashMap::default();
    let mut counts: Vec<ValueCount<K>> = Vec::new();

    for value in values {
        if let Some(&i) = index.get(&value) {
            counts[i].count += 1;
        } else {
            index.insert(value.clone(), counts.len());
            counts.push(ValueCount { value, count: 1 });
        }
    }

    counts
}

/// Sort descending by count; ties keep their first-occurrence order
pub(crate) fn sort_by_count_desc<K>(counts: &mut [ValueCount<K>]) {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
}

/// Distinct non-missing values of a column, sorted
///
/// Feeds selection widgets for the filter engine.
pub fn distinct_values(table: &EstablishmentTable, column: &str) -> Result<Vec<String>> {
    let values = table.strings(column)?;
    let mut distinct: Vec<String> = count_in_order(non_null_values(&values))
        .into_iter()
        .map(|vc| vc.value.to_string())
        .collect();
    distinct.sort_unstable();
    Ok(distinct)
}

/// Number of distinct non-missing values of a column
pub fn distinct_count(table: &EstablishmentTable, column: &str) -> Result<usize> {
    let values = table.strings(column)?;
    Ok(count_in_order(non_null_values(&values)).len())
}
