//! The in-memory establishment table.
//!
//! A thin owner of one Arrow [`RecordBatch`]. Operations that narrow or
//! enrich the table always return a new value; the wrapped batch is never
//! mutated.

use arrow::array::{Date32Array, Int32Array, StringArray};
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::utils::arrow::{date32_column, int32_column, string_column};

/// Normalized establishment records in positional order
#[derive(Debug, Clone)]
pub struct EstablishmentTable {
    batch: RecordBatch,
}

impl EstablishmentTable {
    /// Wrap an existing batch
    #[must_use]
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Concatenate batches sharing `schema`, preserving their order
    pub fn concat(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches).map_err(Error::from)?;
        Ok(Self { batch })
    }

    /// Number of records
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the table holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Table schema
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Column names in table order
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// The underlying batch
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// A column rendered as text
    pub fn strings(&self, column: &str) -> Result<StringArray> {
        string_column(&self.batch, column)
    }

    /// An integer (year) column
    pub fn years(&self, column: &str) -> Result<Int32Array> {
        int32_column(&self.batch, column)
    }

    /// A parsed date column
    pub fn dates(&self, column: &str) -> Result<Date32Array> {
        date32_column(&self.batch, column)
    }

    /// The first `n` records
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        let len = n.min(self.batch.num_rows());
        Self {
            batch: self.batch.slice(0, len),
        }
    }
}

impl From<RecordBatch> for EstablishmentTable {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}
