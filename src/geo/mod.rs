//! Matching municipality counts to boundary features.
//!
//! Names from the table and from the GeoJSON boundaries are compared on a
//! normalized key: diacritics stripped, upper-cased and trimmed. A boundary
//! without matching records is kept with a count of zero.

pub mod boundary;

pub use boundary::{BoundaryCollection, BoundaryFeature};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::aggregate::distribution;
use crate::error::Result;
use crate::schema::NOME_MUNICIPIO;
use crate::table::EstablishmentTable;

/// Canonical matching key for a place name; missing names give `""`
#[must_use]
pub fn normalize_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return String::new();
    };
    let stripped: String = name.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.to_uppercase().trim().to_string()
}

/// Establishments counted for one municipality name of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MunicipalityCount {
    /// Name as it appears in the table
    pub name: String,
    pub count: usize,
    /// Normalized matching key
    pub key: String,
}

/// Count per municipality with its matching key, most frequent first
pub fn municipality_map_data(table: &EstablishmentTable) -> Result<Vec<MunicipalityCount>> {
    let counts = distribution(table, NOME_MUNICIPIO)?
        .into_iter()
        .map(|vc| MunicipalityCount {
            key: normalize_name(Some(&vc.value)),
            name: vc.value,
            count: vc.count,
        })
        .collect();
    Ok(counts)
}

/// A boundary feature paired with its matched count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryCount<'a> {
    pub feature: &'a BoundaryFeature,
    /// Sum of the counts of every table name sharing the feature's key
    pub count: usize,
}

/// Left join of boundary features with municipality counts
///
/// Every feature appears once, in collection order. Several table names
/// normalizing to the same key add up.
#[must_use]
pub fn join_counts<'a>(
    boundaries: &'a BoundaryCollection,
    counts: &[MunicipalityCount],
) -> Vec<BoundaryCount<'a>> {
    let by_key = counts_by_key(counts);
    boundaries
        .features()
        .iter()
        .map(|feature| BoundaryCount {
            feature,
            count: by_key.get(feature.key.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Table municipalities whose key matches no boundary feature
#[must_use]
pub fn unmatched_municipalities<'a>(
    boundaries: &BoundaryCollection,
    counts: &'a [MunicipalityCount],
) -> Vec<&'a MunicipalityCount> {
    let keys: FxHashSet<&str> = boundaries
        .features()
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    counts
        .iter()
        .filter(|c| !keys.contains(c.key.as_str()))
        .collect()
}

fn counts_by_key(counts: &[MunicipalityCount]) -> FxHashMap<&str, usize> {
    let mut by_key: FxHashMap<&str, usize> = FxHashMap::default();
    for c in counts {
        *by_key.entry(c.key.as_str()).or_insert(0) += c.count;
    }
    by_key
}
