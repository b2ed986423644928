//! Column layout of the establishment table.
//!
//! Partition files are read entirely as text so identifiers and codes keep
//! their leading zeros. The normalizer then replaces the two date columns with
//! `Date32` and appends the derived label and year columns.

pub mod codes;
pub mod date_utils;

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub use codes::{EstablishmentType, RegistryStatus, map_status_code, map_type_code};
pub use date_utils::parse_compact_date;

/// 8-digit root of the company identifier
pub const CNPJ_BASICO: &str = "cnpj_basico";
/// Headquarters/branch code
pub const IDENTIFICADOR_MATRIZ_FILIAL: &str = "identificador_matriz_filial";
/// Registration status code
pub const SITUACAO_CADASTRAL: &str = "situacao_cadastral";
/// Date of the current registration status
pub const DATA_SITUACAO_CADASTRAL: &str = "data_situacao_cadastral";
/// Date the establishment started its activity
pub const DATA_INICIO_ATIVIDADE: &str = "data_inicio_atividade";
/// Primary activity classification code
pub const CNAE_FISCAL_PRINCIPAL: &str = "cnae_fiscal_principal";
/// Municipality name, free text
pub const NOME_MUNICIPIO: &str = "nome_municipio";

/// Status label derived from [`SITUACAO_CADASTRAL`]
pub const SITUACAO_DESCRICAO: &str = "situacao_descricao";
/// Type label derived from [`IDENTIFICADOR_MATRIZ_FILIAL`]
pub const TIPO_ESTABELECIMENTO: &str = "tipo_estabelecimento";
/// Year of [`DATA_SITUACAO_CADASTRAL`]
pub const ANO_SITUACAO: &str = "ano_situacao";
/// Year of [`DATA_INICIO_ATIVIDADE`]
pub const ANO_INICIO: &str = "ano_inicio";

/// Columns every partition must provide, in table order
pub const RAW_COLUMNS: [&str; 7] = [
    CNPJ_BASICO,
    IDENTIFICADOR_MATRIZ_FILIAL,
    SITUACAO_CADASTRAL,
    DATA_SITUACAO_CADASTRAL,
    DATA_INICIO_ATIVIDADE,
    CNAE_FISCAL_PRINCIPAL,
    NOME_MUNICIPIO,
];

/// Raw columns that hold `YYYYMMDD` dates
pub const DATE_COLUMNS: [&str; 2] = [DATA_SITUACAO_CADASTRAL, DATA_INICIO_ATIVIDADE];

/// Columns appended by the normalizer, in table order
pub const DERIVED_COLUMNS: [&str; 4] = [SITUACAO_DESCRICAO, TIPO_ESTABELECIMENTO, ANO_SITUACAO, ANO_INICIO];

/// Year columns usable by timelines and year-range filters
pub const YEAR_COLUMNS: [&str; 2] = [ANO_SITUACAO, ANO_INICIO];

/// Whether a column is one the normalizer derives
#[must_use]
pub fn is_derived_column(name: &str) -> bool {
    DERIVED_COLUMNS.contains(&name)
}

/// Build an all-text read schema for the given header names
#[must_use]
pub fn text_schema<S: AsRef<str>>(names: &[S]) -> SchemaRef {
    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field::new(name.as_ref(), DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Names of required raw columns missing from a schema
#[must_use]
pub fn missing_raw_columns(schema: &Schema) -> Vec<&'static str> {
    RAW_COLUMNS
        .iter()
        .copied()
        .filter(|name| schema.index_of(name).is_err())
        .collect()
}
