//! User filter selections.
//!
//! A selection maps column names to the set of accepted raw values plus an
//! optional inclusive year range. An empty accepted set leaves its column
//! unconstrained; it never excludes every row.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::filter::expr::{Expr, LiteralValue};

/// Inclusive range on a year-valued column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Year column the range applies to
    pub column: String,
    /// First accepted year
    pub start: i32,
    /// Last accepted year
    pub end: i32,
}

/// Conjunction of column value sets and an optional year range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    columns: BTreeMap<String, BTreeSet<String>>,
    year_range: Option<YearRange>,
}

impl FilterSelection {
    /// A selection that keeps every row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `values` in `column`, replacing any earlier set for it
    #[must_use]
    pub fn with_values<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.set_values(column, values);
        self
    }

    /// Accept `values` in `column`, replacing any earlier set for it
    pub fn set_values<I, V>(&mut self, column: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.columns
            .insert(column.into(), values.into_iter().map(Into::into).collect());
    }

    /// Restrict `column` to years in `start..=end`
    #[must_use]
    pub fn with_year_range(mut self, column: impl Into<String>, start: i32, end: i32) -> Self {
        self.year_range = Some(YearRange {
            column: column.into(),
            start,
            end,
        });
        self
    }

    /// Remove the year range
    pub fn clear_year_range(&mut self) {
        self.year_range = None;
    }

    /// Accepted values per column, including unconstrained (empty) entries
    #[must_use]
    pub fn columns(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.columns
    }

    /// The year range, if any
    #[must_use]
    pub fn year_range(&self) -> Option<&YearRange> {
        self.year_range.as_ref()
    }

    /// Whether the selection keeps every row
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.year_range.is_none() && self.columns.values().all(BTreeSet::is_empty)
    }

    /// Build the filter expression for this selection
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        let mut exprs: Vec<Expr> = self
            .columns
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(column, values)| {
                Expr::In(
                    column.clone(),
                    values.iter().cloned().map(LiteralValue::String).collect(),
                )
            })
            .collect();

        if let Some(range) = &self.year_range {
            exprs.push(Expr::GtEq(range.column.clone(), LiteralValue::Int(i64::from(range.start))));
            exprs.push(Expr::LtEq(range.column.clone(), LiteralValue::Int(i64::from(range.end))));
        }

        match exprs.len() {
            0 => Expr::AlwaysTrue,
            1 => exprs.remove(0),
            _ => Expr::And(exprs),
        }
    }
}

impl<K, I, V> FromIterator<(K, I)> for FilterSelection
where
    K: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut selection = Self::new();
        for (column, values) in iter {
            selection.set_values(column, values);
        }
        selection
    }
}
