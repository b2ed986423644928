//! Partitioned CSV loading.
//!
//! Each partition is read entirely as text, normalized, and appended to the
//! full table in input order. A partition that cannot be read is skipped and
//! reported as a [`PartitionWarning`]; only a load where every partition fails
//! is an error.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Seek};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rayon::prelude::*;

use crate::config::EstabReaderConfig;
use crate::error::util::{safe_open_file, validate_directory};
use crate::error::{Error, Result};
use crate::normalize::normalize_batch;
use crate::schema::text_schema;
use crate::table::EstablishmentTable;
use crate::utils::logging::{
    create_partition_progress_bar, finish_progress_bar, log_operation_complete,
    log_operation_start, log_warning,
};

/// A partition that was skipped during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionWarning {
    /// Partition that failed
    pub path: PathBuf,
    /// Underlying cause, with its context chain
    pub cause: String,
}

impl fmt::Display for PartitionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load {}: {}", self.path.display(), self.cause)
    }
}

/// The full table together with the non-fatal issues met while loading it
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Concatenation of every partition that loaded
    pub table: EstablishmentTable,
    /// Partitions that loaded, in input order
    pub loaded: Vec<PathBuf>,
    /// Partitions that were skipped, in input order
    pub warnings: Vec<PartitionWarning>,
}

impl LoadOutcome {
    /// Whether any partition was skipped
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Find the CSV partitions in a directory, sorted by file name
pub fn find_partition_files(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for partition files in", dir);
    validate_directory(dir, "finding partition files")?;

    let mut files = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(Error::from)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry
            .map_err(Error::from)
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            files.push(path);
        }
    }

    let files = files
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .collect_vec();

    if files.is_empty() {
        log_warning("No partition files found in directory", Some(dir));
    } else {
        log::info!("Found {} partition files in {}", files.len(), dir.display());
    }

    Ok(files)
}

/// Read and normalize one partition
pub fn read_partition(path: &Path, config: &EstabReaderConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    let raw = read_text_csv(path, config.delimiter, config.batch_size, "reading establishment partition")?;

    let normalized = normalize_batch(&raw, &config.date_format)
        .with_context(|| format!("Failed to normalize {}", path.display()))?;

    log_operation_complete("read", path, normalized.num_rows(), Some(start.elapsed()));
    Ok(normalized)
}

/// Read a delimited file with a header row, every column as nullable text
///
/// Empty fields become missing values. A leading byte-order mark on the
/// first header name is dropped.
///
/// # Errors
/// Malformed records surface as [`Error::Arrow`] under a context naming the
/// file.
pub fn read_text_csv(
    path: &Path,
    delimiter: u8,
    batch_size: usize,
    purpose: &str,
) -> Result<RecordBatch> {
    let file = safe_open_file(path, purpose)?;
    let mut reader = BufReader::new(file);

    let schema = header_schema(&mut reader, delimiter)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;
    reader.rewind().map_err(Error::from)?;

    let csv_reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(delimiter)
        .with_batch_size(batch_size)
        .build(reader)
        .map_err(Error::from)
        .with_context(|| format!("Failed to build CSV reader for {}", path.display()))?;

    let batches = csv_reader
        .collect::<std::result::Result<Vec<_>, ArrowError>>()
        .map_err(Error::from)
        .with_context(|| format!("Failed to parse CSV records in {}", path.display()))?;

    Ok(concat_batches(&schema, &batches).map_err(Error::from)?)
}

/// Column names from the header line, every column typed as text
fn header_schema(reader: &mut BufReader<File>, delimiter: u8) -> Result<SchemaRef> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter);
    let (inferred, _) = format.infer_schema(reader, Some(0)).map_err(Error::from)?;
    let names = inferred
        .fields()
        .iter()
        .map(|f| f.name().trim_start_matches('\u{feff}').to_string())
        .collect_vec();
    Ok(text_schema(&names))
}

/// Load every partition, skipping the ones that fail
///
/// # Errors
/// Returns [`Error::NoDataAvailable`] when no partition could be loaded.
pub fn load_partitions<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &EstabReaderConfig,
) -> Result<LoadOutcome> {
    let start = Instant::now();

    let results: Vec<Result<RecordBatch>> = if config.parallel_load {
        paths
            .par_iter()
            .map(|path| read_partition(path.as_ref(), config))
            .collect()
    } else {
        let progress = config
            .show_progress
            .then(|| create_partition_progress_bar(paths.len() as u64, Some("Loading partitions")));
        let results = paths
            .iter()
            .map(|path| {
                let result = read_partition(path.as_ref(), config);
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
                result
            })
            .collect();
        if let Some(pb) = &progress {
            finish_progress_bar(pb, Some("Partitions loaded"));
        }
        results
    };

    let mut schema: Option<SchemaRef> = None;
    let mut batches = Vec::new();
    let mut loaded = Vec::new();
    let mut warnings = Vec::new();

    for (path, result) in paths.iter().map(|p| p.as_ref()).zip(results) {
        let aligned = match (result, &schema) {
            (Ok(batch), Some(reference)) => align_to_schema(batch, reference, path),
            (other, _) => other,
        };

        match aligned {
            Ok(batch) => {
                if schema.is_none() {
                    schema = Some(batch.schema());
                }
                batches.push(batch);
                loaded.push(path.to_path_buf());
            }
            Err(e) => {
                let warning = PartitionWarning {
                    path: path.to_path_buf(),
                    cause: format!("{e:#}"),
                };
                log_warning(&format!("Skipping partition ({})", warning.cause), Some(path));
                warnings.push(warning);
            }
        }
    }

    let Some(schema) = schema else {
        return Err(Error::NoDataAvailable {
            attempted: paths.len(),
        }
        .into());
    };

    let table = EstablishmentTable::concat(schema, &batches)?;
    log::info!(
        "Loaded {} rows from {} of {} partitions in {:?}",
        table.num_rows(),
        loaded.len(),
        paths.len(),
        start.elapsed()
    );

    Ok(LoadOutcome {
        table,
        loaded,
        warnings,
    })
}

/// Find and load every partition in a directory
pub fn load_directory(dir: &Path, config: &EstabReaderConfig) -> Result<LoadOutcome> {
    let files = find_partition_files(dir)?;
    load_partitions(&files, config)
}

/// Reorder a partition's columns to match the first loaded partition
fn align_to_schema(batch: RecordBatch, reference: &SchemaRef, path: &Path) -> Result<RecordBatch> {
    if batch.schema() == *reference {
        return Ok(batch);
    }

    let schema = batch.schema();
    if schema.fields().len() != reference.fields().len() {
        return Err(Error::SchemaMismatch {
            path: path.to_path_buf(),
            reason: format!(
                "expected {} columns, found {}",
                reference.fields().len(),
                schema.fields().len()
            ),
        }
        .into());
    }

    let mut indices = Vec::with_capacity(reference.fields().len());
    for field in reference.fields() {
        match schema.index_of(field.name()) {
            Ok(idx) if schema.field(idx).data_type() == field.data_type() => indices.push(idx),
            _ => {
                return Err(Error::SchemaMismatch {
                    path: path.to_path_buf(),
                    reason: format!("column '{}' missing or of a different type", field.name()),
                }
                .into());
            }
        }
    }

    Ok(batch.project(&indices).map_err(Error::from)?)
}
