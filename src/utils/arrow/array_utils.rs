//! Utilities for working with Arrow arrays.
//!
//! Typed column access with clear errors. String access casts any other
//! column type to `Utf8` so callers can treat every column as text.

use arrow::array::{Array, ArrayRef, Date32Array, Int32Array, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Get the column index by name from a record batch
///
/// # Errors
/// Returns [`Error::ColumnNotFound`] if the column does not exist
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column_name)
        .map_err(|_| Error::column_not_found(column_name).into())
}

/// Get a column from a record batch by name
///
/// # Errors
/// Returns [`Error::ColumnNotFound`] if the column does not exist
pub fn get_column_by_name(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = get_column_index(batch, column_name)?;
    Ok(batch.column(idx).clone())
}

/// Downcast a column to a specific array type with clear error messages
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected: &'static str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        Error::ColumnType {
            column: column_name.to_string(),
            expected,
        }
        .into()
    })
}

/// Render any array as `Utf8`, casting when needed
pub fn as_string_array(array: &ArrayRef, column_name: &str) -> Result<StringArray> {
    if array.data_type() == &DataType::Utf8 {
        return downcast_array::<StringArray>(array, column_name, "string").cloned();
    }

    let converted = cast(array, &DataType::Utf8).map_err(Error::from)?;
    downcast_array::<StringArray>(&converted, column_name, "string").cloned()
}

/// Get a column as text
pub fn string_column(batch: &RecordBatch, column_name: &str) -> Result<StringArray> {
    let column = get_column_by_name(batch, column_name)?;
    as_string_array(&column, column_name)
}

/// Get an `Int32` column
///
/// Other integer widths are cast; non-integer columns are rejected.
pub fn int32_column(batch: &RecordBatch, column_name: &str) -> Result<Int32Array> {
    let column = get_column_by_name(batch, column_name)?;
    match column.data_type() {
        DataType::Int32 => downcast_array::<Int32Array>(&column, column_name, "Int32").cloned(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let converted = cast(&column, &DataType::Int32).map_err(Error::from)?;
            downcast_array::<Int32Array>(&converted, column_name, "Int32").cloned()
        }
        _ => Err(Error::ColumnType {
            column: column_name.to_string(),
            expected: "Int32",
        }
        .into()),
    }
}

/// Get a `Date32` column
pub fn date32_column(batch: &RecordBatch, column_name: &str) -> Result<Date32Array> {
    let column = get_column_by_name(batch, column_name)?;
    downcast_array::<Date32Array>(&column, column_name, "Date32").cloned()
}

/// Iterate the non-null values of a string array
pub fn non_null_values(array: &StringArray) -> impl Iterator<Item = &str> {
    array.iter().flatten()
}
