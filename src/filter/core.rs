//! Mask application.

use anyhow::Context;
use arrow::array::{Array, BooleanArray};
use arrow::compute::filter_record_batch as arrow_filter_record_batch;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Keep the rows of `batch` whose mask entry is `true`
///
/// Null mask entries drop their row. A mask keeping every row returns the
/// batch without copying.
///
/// # Errors
/// Returns an error if the mask length differs from the batch row count
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        anyhow::bail!(
            "Filter mask has {} entries for {} rows",
            mask.len(),
            batch.num_rows()
        );
    }

    if mask.null_count() == 0 && mask.true_count() == mask.len() {
        return Ok(batch.clone());
    }

    arrow_filter_record_batch(batch, mask)
        .map_err(Error::from)
        .context("Failed to apply filter mask")
}
