//! File access helpers that attach the path and purpose to every failure.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
enum PathKind {
    File,
    Directory,
}

/// Open a file, reporting missing paths and permission problems as [`Error::Path`]
///
/// `purpose` completes "while ..." in the error message, e.g.
/// `"reading establishment partition"`.
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    require_kind(path, purpose, PathKind::File)?;
    fs::File::open(path).map_err(|e| io_failure(path, purpose, e))
}

/// Check that a directory exists and can be listed
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    require_kind(path, purpose, PathKind::Directory)?;
    fs::read_dir(path)
        .map(|_| ())
        .map_err(|e| io_failure(path, purpose, e))
}

/// Read a whole UTF-8 file
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| io_failure(path, purpose, e))?;
    Ok(content)
}

fn require_kind(path: &Path, purpose: &str, kind: PathKind) -> Result<()> {
    let (present, noun) = match kind {
        PathKind::File => (path.is_file(), "file"),
        PathKind::Directory => (path.is_dir(), "directory"),
    };
    if present {
        return Ok(());
    }

    let message = if path.exists() {
        format!("Not a {noun} (needed while {purpose})")
    } else {
        format!("No such {noun} (needed while {purpose})")
    };
    Err(Error::path(path, message).into())
}

fn io_failure(path: &Path, purpose: &str, e: io::Error) -> anyhow::Error {
    let message = match e.kind() {
        io::ErrorKind::PermissionDenied => format!("Permission denied while {purpose}"),
        io::ErrorKind::InvalidData => format!("Invalid UTF-8 while {purpose}"),
        _ => format!("I/O failure while {purpose}"),
    };
    Error::path_with_source(path, message, e).into()
}
