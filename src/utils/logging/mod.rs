//! Utilities for logging and progress tracking

pub mod log;
pub mod progress;

pub use log::{log_degraded, log_operation_complete, log_operation_start, log_warning};
pub use progress::{create_partition_progress_bar, finish_progress_bar};
