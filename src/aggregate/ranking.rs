//! Frequency rankings and categorical distributions.

use serde::Serialize;

use crate::error::Result;
use crate::lookup::ActivityLookup;
use crate::schema::{CNAE_FISCAL_PRINCIPAL, NOME_MUNICIPIO, SITUACAO_DESCRICAO, TIPO_ESTABELECIMENTO};
use crate::table::EstablishmentTable;
use crate::utils::arrow::non_null_values;

use super::{ValueCount, count_in_order, sort_by_count_desc};

/// Non-missing values of `column` with their counts, most frequent first
///
/// Ties keep the order in which values first appear in the table.
pub fn distribution(table: &EstablishmentTable, column: &str) -> Result<Vec<ValueCount<String>>> {
    let values = table.strings(column)?;
    let mut counts: Vec<ValueCount<String>> = count_in_order(non_null_values(&values))
        .into_iter()
        .map(|vc| ValueCount {
            value: vc.value.to_string(),
            count: vc.count,
        })
        .collect();
    sort_by_count_desc(&mut counts);
    Ok(counts)
}

/// The `n` most frequent non-missing values of `column`
///
/// Returns fewer than `n` entries when there are fewer distinct values.
pub fn top_values(
    table: &EstablishmentTable,
    column: &str,
    n: usize,
) -> Result<Vec<ValueCount<String>>> {
    let mut counts = distribution(table, column)?;
    counts.truncate(n);
    Ok(counts)
}

/// The `n` municipalities with the most establishments
pub fn top_municipalities(table: &EstablishmentTable, n: usize) -> Result<Vec<ValueCount<String>>> {
    top_values(table, NOME_MUNICIPIO, n)
}

/// The `n` most frequent primary activity codes
pub fn top_activities(table: &EstablishmentTable, n: usize) -> Result<Vec<ValueCount<String>>> {
    top_values(table, CNAE_FISCAL_PRINCIPAL, n)
}

/// Establishments per registration status label
pub fn status_distribution(table: &EstablishmentTable) -> Result<Vec<ValueCount<String>>> {
    distribution(table, SITUACAO_DESCRICAO)
}

/// Establishments per establishment type label
pub fn type_distribution(table: &EstablishmentTable) -> Result<Vec<ValueCount<String>>> {
    distribution(table, TIPO_ESTABELECIMENTO)
}

/// An activity code with its description and count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedActivity {
    pub code: String,
    /// Description from the lookup table, or the code itself when unknown
    pub description: String,
    pub count: usize,
}

/// [`top_activities`] with descriptions attached
///
/// Without a lookup table every description falls back to the raw code.
pub fn top_activities_with_descriptions(
    table: &EstablishmentTable,
    n: usize,
    lookup: Option<&ActivityLookup>,
) -> Result<Vec<RankedActivity>> {
    let ranked = distribution(table, CNAE_FISCAL_PRINCIPAL)?
        .into_iter()
        .map(|vc| {
            let description = lookup
                .and_then(|l| l.describe(&vc.value))
                .map_or_else(|| vc.value.clone(), str::to_string);
            RankedActivity {
                code: vc.value,
                description,
                count: vc.count,
            }
        })
        .take(n)
        .collect();
    Ok(ranked)
}
