//! Shared helpers: Arrow column access and logging.

pub mod arrow;
pub mod logging;

pub use logging::{log_degraded, log_operation_complete, log_operation_start, log_warning};
