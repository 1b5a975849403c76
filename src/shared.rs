use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::LoadError;
use crate::prepare::{PreparedDataset, load_dataset};

/// One dataset version, prepared on first use and shared read-only after that.
///
/// A failed load leaves the handle empty, so the next call retries.
#[derive(Debug)]
pub struct DatasetHandle {
    path: PathBuf,
    cell: OnceCell<Arc<PreparedDataset>>,
}

impl DatasetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Wrap an already prepared dataset.
    pub fn from_dataset(path: impl Into<PathBuf>, dataset: PreparedDataset) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::with_value(Arc::new(dataset)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<PreparedDataset>, LoadError> {
        self.cell
            .get_or_try_init(|| load_dataset(&self.path).map(Arc::new))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_load_stays_unloaded() {
        let handle = DatasetHandle::new("missing/players.csv");
        assert!(handle.get().is_err());
        assert!(!handle.is_loaded());
    }

    #[test]
    fn prebuilt_dataset_is_shared() {
        let handle = DatasetHandle::from_dataset("memory", PreparedDataset::default());
        assert!(handle.is_loaded());
        let a = handle.get().unwrap();
        let b = handle.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
