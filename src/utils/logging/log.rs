//! Logging helpers
//!
//! Consistent messages for load and export milestones and for every
//! non-fatal degradation the data layer recovers from.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

/// Log the start of an operation on a file or directory
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log a completed operation with the number of rows it produced
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {operation} {rows} rows from {} in {duration:?}",
            path.display()
        ),
        None => log::info!("Successfully {operation} {rows} rows from {}", path.display()),
    }
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}

/// Log a feature that keeps working in a reduced form
pub fn log_degraded(feature: &str, cause: impl Display) {
    log::warn!("{feature} unavailable, continuing without it: {cause}");
}
