use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use estab_reader::schema::{RAW_COLUMNS, text_schema};
use estab_reader::{EstabReaderConfig, EstablishmentTable, normalize_batch};

/// Header line of a partition file
pub const HEADER: &str = "cnpj_basico,identificador_matriz_filial,situacao_cadastral,data_situacao_cadastral,data_inicio_atividade,cnae_fiscal_principal,nome_municipio";

/// One raw record, in `RAW_COLUMNS` order
pub type RawRow = [Option<&'static str>; 7];

/// Seven records covering every code, a missing date and malformed values
///
/// Derived expectations:
/// - types: 4 Matriz, 2 Filial, 1 unknown
/// - statuses: 4 Ativa, 1 Baixada, 1 Suspensa, 1 unknown
/// - municipalities: Porto Alegre 3, Canoas 2, São Leopoldo 1, 1 missing
/// - activities: 4711302 x3, 6422100 x2, 4731800 x1, 1 missing
/// - `ano_inicio`: 1966, 2011, 1998, 2019, 2020, missing, missing
pub const SAMPLE_ROWS: [RawRow; 7] = [
    [Some("00000191"), Some("1"), Some("02"), Some("20050103"), Some("19661101"), Some("6422100"), Some("Porto Alegre")],
    [Some("33000167"), Some("2"), Some("02"), Some("20051103"), Some("20110315"), Some("4731800"), Some("Porto Alegre")],
    [Some("11111111"), Some("1"), Some("08"), Some("20200101"), Some("19980520"), Some("4711302"), Some("Canoas")],
    [Some("22222222"), Some("2"), Some("02"), Some("20190101"), Some("20190707"), Some("4711302"), Some("São Leopoldo")],
    [Some("33333333"), Some("1"), Some("03"), Some("20150101"), Some("20200210"), Some("6422100"), Some("Porto Alegre")],
    [Some("44444444"), Some("1"), Some("02"), None, None, Some("4711302"), Some("Canoas")],
    [Some("55555555"), Some("9"), Some("99"), Some("2015013x"), Some("20211301"), None, None],
];

/// Build a normalized table from raw records
#[must_use]
pub fn table_from_rows(rows: &[RawRow]) -> EstablishmentTable {
    let columns: Vec<ArrayRef> = (0..RAW_COLUMNS.len())
        .map(|col| {
            let values: StringArray = rows.iter().map(|row| row[col]).collect();
            Arc::new(values) as ArrayRef
        })
        .collect();
    let raw = RecordBatch::try_new(text_schema(&RAW_COLUMNS), columns).unwrap();
    EstablishmentTable::new(normalize_batch(&raw, "%Y%m%d").unwrap())
}

/// The normalized sample table
#[must_use]
pub fn sample_table() -> EstablishmentTable {
    table_from_rows(&SAMPLE_ROWS)
}

/// Render raw records as partition text with a header line
#[must_use]
pub fn partition_text(rows: &[RawRow]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        let line: Vec<&str> = row.iter().map(|v| v.unwrap_or("")).collect();
        text.push_str(&line.join(","));
        text.push('\n');
    }
    text
}

/// Write a file into `dir` and return its path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Configuration used by the loading tests
#[must_use]
pub fn test_config() -> EstabReaderConfig {
    EstabReaderConfig {
        batch_size: 2,
        ..Default::default()
    }
}
