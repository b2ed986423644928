//! Filtering of the establishment table
//!
//! A [`FilterSelection`] is turned into an [`Expr`], evaluated to a boolean
//! mask, and applied to a copy of the table. The input table is never
//! modified.

pub mod core;
pub mod expr;
pub mod selection;

pub use self::core::filter_record_batch;
pub use expr::{Expr, LiteralValue, evaluate_expr};
pub use selection::{FilterSelection, YearRange};

use crate::error::Result;
use crate::table::EstablishmentTable;

/// Apply a user selection to a table
///
/// # Errors
/// Returns an error if a constrained column does not exist, or if the year
/// range names a non-integer column
pub fn filter_table(
    table: &EstablishmentTable,
    selection: &FilterSelection,
) -> Result<EstablishmentTable> {
    filter_table_by_expr(table, &selection.to_expr())
}

/// Apply a filter expression to a table
pub fn filter_table_by_expr(table: &EstablishmentTable, expr: &Expr) -> Result<EstablishmentTable> {
    let mask = evaluate_expr(table.batch(), expr)?;
    let batch = filter_record_batch(table.batch(), &mask)?;

    log::debug!(
        "Filter kept {} of {} rows ({} constrained columns)",
        batch.num_rows(),
        table.num_rows(),
        expr.required_columns().len()
    );

    Ok(EstablishmentTable::new(batch))
}
