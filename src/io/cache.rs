//! Load-once dataset cache.
//!
//! The dataset is parsed at most once per cache and then shared read-only.
//! Both caches here are single-assignment cells:
//!
//! - the first *successful* load is stored and every later call returns it
//!   without touching the file again
//! - a failed load stores nothing, so the next call retries from scratch
//! - once filled, the cell is never replaced; a call with a different path
//!   still returns the stored dataset (and logs a warning)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::domain::Dataset;
use crate::io::ingest::{LoadError, load_dataset};

/// A dataset together with the path it was loaded from.
#[derive(Debug)]
struct Cached {
    path: PathBuf,
    dataset: Dataset,
}

/// An owned single-assignment dataset cell.
#[derive(Debug, Default)]
pub struct DatasetCache {
    cell: OnceLock<Cached>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached dataset, loading it with `loader` on first use.
    pub fn get_or_load_with<F>(&self, path: &Path, loader: F) -> Result<&Dataset, LoadError>
    where
        F: FnOnce(&Path) -> Result<Dataset, LoadError>,
    {
        if let Some(cached) = self.cell.get() {
            if cached.path != path {
                warn!(
                    action = "reuse",
                    component = "dataset_cache",
                    cached = ?cached.path,
                    requested = ?path,
                    "Dataset already loaded from a different path; returning cached copy"
                );
            } else {
                debug!(action = "hit", component = "dataset_cache", path = ?path, "Dataset cache hit");
            }
            return Ok(&cached.dataset);
        }

        let dataset = loader(path)?;
        let cached = self.cell.get_or_init(|| Cached {
            path: path.to_path_buf(),
            dataset,
        });
        Ok(&cached.dataset)
    }

    /// Return the cached dataset, reading `path` from disk on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<&Dataset, LoadError> {
        self.get_or_load_with(path, load_dataset)
    }

    pub fn get(&self) -> Option<&Dataset> {
        self.cell.get().map(|c| &c.dataset)
    }
}

static SHARED: DatasetCache = DatasetCache::new();

/// The process-wide dataset. Loaded on the first successful call.
pub fn shared_dataset(path: &Path) -> Result<&'static Dataset, LoadError> {
    SHARED.get_or_load(path)
}
