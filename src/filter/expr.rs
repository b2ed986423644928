//! Filter expressions and their evaluation against a record batch.

use std::collections::HashSet;
use std::fmt;

use arrow::array::{BooleanArray, Int32Array};
use arrow::compute::kernels::cmp::{gt_eq, lt_eq};
use arrow::compute::{and, is_not_null};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::utils::arrow::{get_column_by_name, int32_column, string_column};

/// Represents a filter expression over table columns
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is less than or equal to a literal value
    LtEq(String, LiteralValue),

    /// Column is not null
    IsNotNull(String),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Always evaluates to true
    AlwaysTrue,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// String value
    String(String),

    /// Integer value
    Int(i64),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl Expr {
    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _)
            | Self::In(col, _)
            | Self::GtEq(col, _)
            | Self::LtEq(col, _)
            | Self::IsNotNull(col) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::AlwaysTrue => {}
        }
    }
}

/// Evaluates a filter expression against a record batch
///
/// The returned mask may contain nulls where a comparison touched a missing
/// value; masks treat null as "drop the row".
///
/// # Errors
/// Returns an error if a referenced column is missing or has the wrong type
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),
        Expr::And(exprs) => evaluate_and_expression(batch, exprs),
        Expr::Eq(col_name, value) => evaluate_in_expression(batch, col_name, std::slice::from_ref(value)),
        Expr::In(col_name, values) => evaluate_in_expression(batch, col_name, values),
        Expr::GtEq(col_name, value) => evaluate_bound(batch, col_name, value, Bound::Lower),
        Expr::LtEq(col_name, value) => evaluate_bound(batch, col_name, value, Bound::Upper),
        Expr::IsNotNull(col_name) => {
            let column = get_column_by_name(batch, col_name)?;
            Ok(is_not_null(column.as_ref()).map_err(Error::from)?)
        }
    }
}

/// Evaluates a logical AND expression
fn evaluate_and_expression(batch: &RecordBatch, exprs: &[Expr]) -> Result<BooleanArray> {
    let Some((first, rest)) = exprs.split_first() else {
        return Ok(BooleanArray::from(vec![true; batch.num_rows()]));
    };

    let mut result = evaluate_expr(batch, first)?;
    for expr in rest {
        let mask = evaluate_expr(batch, expr)?;
        result = and(&result, &mask).map_err(Error::from)?;
    }

    Ok(result)
}

/// Set membership on the text rendering of a column; missing values never match
fn evaluate_in_expression(
    batch: &RecordBatch,
    col_name: &str,
    values: &[LiteralValue],
) -> Result<BooleanArray> {
    let column = string_column(batch, col_name)?;
    let accepted: HashSet<String> = values.iter().map(ToString::to_string).collect();

    Ok(column
        .iter()
        .map(|value| Some(value.is_some_and(|v| accepted.contains(v))))
        .collect())
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Inclusive integer bound on a column
fn evaluate_bound(
    batch: &RecordBatch,
    col_name: &str,
    value: &LiteralValue,
    bound: Bound,
) -> Result<BooleanArray> {
    let LiteralValue::Int(n) = value else {
        return Err(anyhow::anyhow!(
            "Unsupported literal for range comparison on '{col_name}': {value:?}"
        ));
    };
    let column = int32_column(batch, col_name)?;

    let Ok(n) = i32::try_from(*n) else {
        // Out of i32 range: every present value is on one side of the bound
        let keep = match bound {
            Bound::Lower => *n < 0,
            Bound::Upper => *n > 0,
        };
        return Ok(column.iter().map(|v| v.map(|_| keep)).collect());
    };

    let scalar = Int32Array::new_scalar(n);
    let mask = match bound {
        Bound::Lower => gt_eq(&column, &scalar).map_err(Error::from)?,
        Bound::Upper => lt_eq(&column, &scalar).map_err(Error::from)?,
    };
    Ok(mask)
}
