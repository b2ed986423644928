//! Headline counts for a filtered table.

use arrow::array::StringArray;
use serde::Serialize;

use crate::error::Result;
use crate::schema::{
    CNAE_FISCAL_PRINCIPAL, EstablishmentType, NOME_MUNICIPIO, RegistryStatus, SITUACAO_DESCRICAO,
    TIPO_ESTABELECIMENTO,
};
use crate::table::EstablishmentTable;
use crate::utils::arrow::non_null_values;

use super::distinct_count;

/// Headline counts; all zero for an empty table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    /// Number of records
    pub total: usize,
    /// Records whose type is "Matriz"
    pub headquarters: usize,
    /// Records whose type is "Filial"
    pub branches: usize,
    /// Records whose status is "Ativa"
    pub active: usize,
    /// Records whose status is "Baixada"
    pub closed: usize,
    /// Distinct non-missing municipality names
    pub municipalities: usize,
    /// Distinct non-missing activity codes
    pub activity_codes: usize,
}

/// Compute the headline counts of a table
pub fn summary_stats(table: &EstablishmentTable) -> Result<SummaryStats> {
    let types = table.strings(TIPO_ESTABELECIMENTO)?;
    let statuses = table.strings(SITUACAO_DESCRICAO)?;

    Ok(SummaryStats {
        total: table.num_rows(),
        headquarters: count_label(&types, EstablishmentType::Matriz.label()),
        branches: count_label(&types, EstablishmentType::Filial.label()),
        active: count_label(&statuses, RegistryStatus::Ativa.label()),
        closed: count_label(&statuses, RegistryStatus::Baixada.label()),
        municipalities: distinct_count(table, NOME_MUNICIPIO)?,
        activity_codes: distinct_count(table, CNAE_FISCAL_PRINCIPAL)?,
    })
}

fn count_label(values: &StringArray, label: &str) -> usize {
    non_null_values(values).filter(|v| *v == label).count()
}
