//! Activity code descriptions.
//!
//! The lookup file is a delimited table whose first column is an activity
//! code and whose second column is its description. Codes are matched on
//! their digits only, so `4711-3/02` and `4711302` name the same activity.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::config::EstabReaderConfig;
use crate::error::{Error, Result};
use crate::loader::read_text_csv;
use crate::utils::arrow::as_string_array;
use crate::utils::logging::log_degraded;

/// Descriptions keyed by digits-only activity code
#[derive(Debug, Clone, Default)]
pub struct ActivityLookup {
    descriptions: FxHashMap<String, String>,
}

impl ActivityLookup {
    /// Build a lookup from `(code, description)` pairs
    ///
    /// When a code repeats, the first description wins.
    pub fn from_pairs<I, C, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, D)>,
        C: AsRef<str>,
        D: Into<String>,
    {
        let mut descriptions = FxHashMap::default();
        for (code, description) in pairs {
            descriptions
                .entry(lookup_key(code.as_ref()))
                .or_insert_with(|| description.into());
        }
        Self { descriptions }
    }

    /// Read a lookup file split on `config.lookup_delimiter`
    ///
    /// # Errors
    /// Returns [`Error::Lookup`] when the file has fewer than two columns,
    /// and a path or parse error when it cannot be read.
    pub fn from_path(path: &Path, config: &EstabReaderConfig) -> Result<Self> {
        let batch = read_text_csv(
            path,
            config.lookup_delimiter,
            config.batch_size,
            "reading activity descriptions",
        )?;
        if batch.num_columns() < 2 {
            return Err(Error::Lookup(format!(
                "{} has {} column(s), expected code and description",
                path.display(),
                batch.num_columns()
            ))
            .into());
        }

        let schema = batch.schema();
        let codes = as_string_array(batch.column(0), schema.field(0).name())?;
        let labels = as_string_array(batch.column(1), schema.field(1).name())?;

        let lookup = Self::from_pairs(
            codes
                .iter()
                .zip(labels.iter())
                .filter_map(|(code, label)| Some((code?, label?))),
        );
        log::info!(
            "Loaded {} activity descriptions from {}",
            lookup.len(),
            path.display()
        );
        Ok(lookup)
    }

    /// Read a lookup file, logging and returning `None` on failure
    #[must_use]
    pub fn load_or_degrade(path: &Path, config: &EstabReaderConfig) -> Option<Self> {
        match Self::from_path(path, config) {
            Ok(lookup) => Some(lookup),
            Err(e) => {
                log_degraded("activity descriptions", format!("{e:#}"));
                None
            }
        }
    }

    /// Description of an activity code, if known
    #[must_use]
    pub fn describe(&self, code: &str) -> Option<&str> {
        self.descriptions.get(&lookup_key(code)).map(String::as_str)
    }

    /// Description of an activity code, or the code itself
    #[must_use]
    pub fn describe_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.describe(code).unwrap_or(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

/// Digits of a code; codes without digits are matched trimmed
fn lookup_key(code: &str) -> String {
    let digits: String = code.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        code.trim().to_string()
    } else {
        digits
    }
}
