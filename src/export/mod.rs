//! Encoding a table for download.
//!
//! Both encoders write a header row followed by every record in table
//! order. Missing values become empty cells.

use std::time::Instant;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, Date32Array, Int32Array};
use arrow::csv::WriterBuilder;
use arrow::datatypes::DataType;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::{Error, Result};
use crate::schema::date_utils::days_to_date;
use crate::table::EstablishmentTable;
use crate::utils::arrow::{as_string_array, downcast_array};

/// Rows available on one worksheet, header included
pub const MAX_SHEET_ROWS: usize = 1_048_576;

/// Download file name stamped with `at`, e.g. `estabelecimentos_ativos_20240131_142500.csv`
#[must_use]
pub fn export_file_name(prefix: &str, extension: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.{extension}", at.format("%Y%m%d_%H%M%S"))
}

/// Encode a table as comma-separated text with a header row
///
/// Dates are written as `YYYY-MM-DD`.
pub fn to_csv(table: &EstablishmentTable) -> Result<Vec<u8>> {
    let start = Instant::now();
    let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
    writer
        .write(table.batch())
        .map_err(Error::from)
        .context("Failed to encode table as CSV")?;
    let bytes = writer.into_inner();

    log::debug!(
        "Encoded {} rows as CSV ({} bytes) in {:?}",
        table.num_rows(),
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}

/// Encode a table as a single-sheet xlsx workbook
///
/// # Errors
/// Fails when the table does not fit on one worksheet or the sheet name is
/// rejected by the workbook writer.
pub fn to_spreadsheet(table: &EstablishmentTable, sheet_name: &str) -> Result<Vec<u8>> {
    let start = Instant::now();
    if table.num_rows() >= MAX_SHEET_ROWS {
        anyhow::bail!(
            "Table has {} rows; a worksheet holds at most {} records",
            table.num_rows(),
            MAX_SHEET_ROWS - 1
        );
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(Error::from)
        .with_context(|| format!("Invalid worksheet name '{sheet_name}'"))?;

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let batch = table.batch();
    let schema = batch.schema();
    for (idx, field) in schema.fields().iter().enumerate() {
        let col = u16::try_from(idx).context("Too many columns for a worksheet")?;
        worksheet
            .write_string_with_format(0, col, field.name().as_str(), &header_format)
            .map_err(Error::from)?;
        write_column(worksheet, col, batch.column(idx), field.name(), &date_format)?;
    }

    let bytes = workbook.save_to_buffer().map_err(Error::from)?;
    log::debug!(
        "Encoded {} rows as xlsx ({} bytes) in {:?}",
        table.num_rows(),
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}

/// Write one column below the header row
fn write_column(
    worksheet: &mut Worksheet,
    col: u16,
    array: &ArrayRef,
    name: &str,
    date_format: &Format,
) -> Result<()> {
    match array.data_type() {
        DataType::Int32 => {
            let values = downcast_array::<Int32Array>(array, name, "Int32")?;
            for (row, value) in values.iter().enumerate() {
                if let Some(v) = value {
                    worksheet
                        .write_number(sheet_row(row)?, col, f64::from(v))
                        .map_err(Error::from)?;
                }
            }
        }
        DataType::Date32 => {
            let values = downcast_array::<Date32Array>(array, name, "Date32")?;
            for (row, value) in values.iter().enumerate() {
                if let Some(date) = value.and_then(days_to_date) {
                    worksheet
                        .write_datetime_with_format(sheet_row(row)?, col, &date, date_format)
                        .map_err(Error::from)?;
                }
            }
        }
        _ => {
            let values = as_string_array(array, name)?;
            for (row, value) in values.iter().enumerate() {
                if let Some(v) = value {
                    worksheet
                        .write_string(sheet_row(row)?, col, v)
                        .map_err(Error::from)?;
                }
            }
        }
    }
    Ok(())
}

/// Worksheet row of a record; row 0 holds the header
fn sheet_row(record: usize) -> Result<u32> {
    Ok(u32::try_from(record + 1)?)
}
