//! Enrichment of raw partitions.
//!
//! Maps status and type codes to labels, parses the two `YYYYMMDD` date
//! columns into `Date32` and derives their calendar years. Every derived value
//! depends only on its raw source, so normalizing an already normalized batch
//! gives the same batch back.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::schema::date_utils::{date_to_days, parse_compact_date, year_of_days};
use crate::schema::{
    ANO_INICIO, ANO_SITUACAO, DATA_INICIO_ATIVIDADE, DATA_SITUACAO_CADASTRAL, DATE_COLUMNS,
    IDENTIFICADOR_MATRIZ_FILIAL, SITUACAO_CADASTRAL, SITUACAO_DESCRICAO, TIPO_ESTABELECIMENTO,
    is_derived_column, map_status_code, map_type_code, missing_raw_columns,
};
use crate::utils::arrow::{as_string_array, downcast_array, string_column};

/// Normalize one batch
///
/// Derived columns already present are dropped and rebuilt from their raw
/// sources. Date columns already typed `Date32` are kept as they are.
///
/// # Errors
/// Fails only when a required raw column is missing or has an unusable type.
/// Unknown codes and malformed dates become nulls.
pub fn normalize_batch(batch: &RecordBatch, date_format: &str) -> Result<RecordBatch> {
    if let Some(missing) = missing_raw_columns(&batch.schema()).first() {
        return Err(Error::column_not_found(*missing).into());
    }

    let status_codes = string_column(batch, SITUACAO_CADASTRAL)?;
    let type_codes = string_column(batch, IDENTIFICADOR_MATRIZ_FILIAL)?;
    let status_labels: StringArray = status_codes.iter().map(map_status_code).collect();
    let type_labels: StringArray = type_codes.iter().map(map_type_code).collect();
    let unknown_status = unmapped_count(&status_codes, &status_labels);
    let unknown_types = unmapped_count(&type_codes, &type_labels);

    let schema = batch.schema();
    let mut fields: Vec<Field> = Vec::with_capacity(schema.fields().len() + 4);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len() + 4);
    let mut status_dates: Option<Date32Array> = None;
    let mut start_dates: Option<Date32Array> = None;

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let name = field.name().as_str();
        if is_derived_column(name) {
            continue;
        }

        if DATE_COLUMNS.contains(&name) {
            let dates = parse_date_column(column, name, date_format)?;
            if name == DATA_SITUACAO_CADASTRAL {
                status_dates = Some(dates.clone());
            } else if name == DATA_INICIO_ATIVIDADE {
                start_dates = Some(dates.clone());
            }
            fields.push(Field::new(name, DataType::Date32, true));
            columns.push(Arc::new(dates));
        } else {
            fields.push(field.as_ref().clone());
            columns.push(column.clone());
        }
    }

    let status_dates = match status_dates {
        Some(dates) => dates,
        None => return Err(Error::column_not_found(DATA_SITUACAO_CADASTRAL).into()),
    };
    let start_dates = match start_dates {
        Some(dates) => dates,
        None => return Err(Error::column_not_found(DATA_INICIO_ATIVIDADE).into()),
    };

    fields.push(Field::new(SITUACAO_DESCRICAO, DataType::Utf8, true));
    columns.push(Arc::new(status_labels));
    fields.push(Field::new(TIPO_ESTABELECIMENTO, DataType::Utf8, true));
    columns.push(Arc::new(type_labels));
    fields.push(Field::new(ANO_SITUACAO, DataType::Int32, true));
    columns.push(Arc::new(years_of(&status_dates)));
    fields.push(Field::new(ANO_INICIO, DataType::Int32, true));
    columns.push(Arc::new(years_of(&start_dates)));

    let normalized = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Error::from)?;
    log::debug!(
        "Normalized batch with {} rows ({unknown_status} unknown status codes, {unknown_types} unknown type codes)",
        normalized.num_rows(),
    );
    Ok(normalized)
}

/// Parse a raw date column, passing `Date32` columns through
fn parse_date_column(column: &ArrayRef, name: &str, date_format: &str) -> Result<Date32Array> {
    if column.data_type() == &DataType::Date32 {
        return downcast_array::<Date32Array>(column, name, "Date32").cloned();
    }

    let raw = as_string_array(column, name)?;
    Ok(raw
        .iter()
        .map(|value| {
            value
                .and_then(|s| parse_compact_date(s, date_format))
                .map(date_to_days)
        })
        .collect())
}

/// Calendar year of every date; null where the date is null
fn years_of(dates: &Date32Array) -> Int32Array {
    dates.iter().map(|days| days.and_then(year_of_days)).collect()
}

/// Rows with a present code that did not map to a label
fn unmapped_count(codes: &StringArray, labels: &StringArray) -> usize {
    (0..codes.len())
        .filter(|&i| codes.is_valid(i) && labels.is_null(i))
        .count()
}
