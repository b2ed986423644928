//! Memoized loading.
//!
//! A load is reused while every partition keeps its path, size and
//! modification time and the parsing options are unchanged. Only the newest
//! load of a given list of partitions is kept. Failed loads are never cached.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use rustc_hash::FxHashMap;

use crate::config::EstabReaderConfig;
use crate::error::Result;
use crate::loader::{LoadOutcome, load_partitions};

/// File identity used to detect changed partitions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PartitionStamp {
    path: PathBuf,
    len: Option<u64>,
    modified: Option<SystemTime>,
}

impl PartitionStamp {
    fn of(path: &Path) -> Self {
        let metadata = std::fs::metadata(path).ok();
        Self {
            path: path.to_path_buf(),
            len: metadata.as_ref().map(std::fs::Metadata::len),
            modified: metadata.and_then(|m| m.modified().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    partitions: Vec<PartitionStamp>,
    delimiter: u8,
    date_format: String,
}

impl CacheKey {
    fn same_paths(&self, other: &Self) -> bool {
        self.partitions.len() == other.partitions.len()
            && self
                .partitions
                .iter()
                .zip(&other.partitions)
                .all(|(a, b)| a.path == b.path)
    }
}

/// Cache of load outcomes shared behind `Arc`
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: FxHashMap<CacheKey, Arc<LoadOutcome>>,
    hits: usize,
    misses: usize,
}

impl LoadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `paths`, loading it on a miss
    pub fn get_or_load<P: AsRef<Path> + Sync>(
        &mut self,
        paths: &[P],
        config: &EstabReaderConfig,
    ) -> Result<Arc<LoadOutcome>> {
        let key = CacheKey {
            partitions: paths.iter().map(|p| PartitionStamp::of(p.as_ref())).collect(),
            delimiter: config.delimiter,
            date_format: config.date_format.clone(),
        };

        if let Some(outcome) = self.entries.get(&key) {
            self.hits += 1;
            log::debug!("Load cache hit for {} partitions", paths.len());
            return Ok(Arc::clone(outcome));
        }

        self.misses += 1;
        let before = self.entries.len();
        self.entries.retain(|cached, _| !cached.same_paths(&key));
        if self.entries.len() < before {
            log::debug!("Evicted stale load of {} partitions", paths.len());
        }

        let outcome = Arc::new(load_partitions(paths, config)?);
        self.entries.insert(key, Arc::clone(&outcome));
        Ok(outcome)
    }

    /// Drop every cached outcome
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups served from the cache
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of lookups that triggered a load
    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }
}
