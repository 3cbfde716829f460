//! Process-wide cache of the loaded dataset.
//!
//! The dataset is read once and then shared by `Arc` with every run. It is
//! read again only on an explicit reload, and a failed reload leaves the
//! cached data in place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::data::Dataset;
use crate::error::DashboardResult;

#[derive(Debug)]
pub struct DataStore {
    dir: PathBuf,
    slot: RwLock<Option<Arc<Dataset>>>,
}

impl DataStore {
    /// A store for the data files in `dir`. Nothing is read until `get`.
    pub fn new(dir: impl Into<PathBuf>) -> DataStore {
        DataStore {
            dir: dir.into(),
            slot: RwLock::new(None),
        }
    }

    /// A store already holding `dataset`.
    pub fn with_dataset(dir: impl Into<PathBuf>, dataset: Dataset) -> DataStore {
        DataStore {
            dir: dir.into(),
            slot: RwLock::new(Some(Arc::new(dataset))),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The cached dataset, loading it on first use.
    pub fn get(&self) -> DashboardResult<Arc<Dataset>> {
        if let Some(ds) = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(ds));
        }
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have loaded it while we waited for the write lock
        if let Some(ds) = slot.as_ref() {
            return Ok(Arc::clone(ds));
        }
        let ds = Arc::new(Dataset::load(&self.dir)?);
        *slot = Some(Arc::clone(&ds));
        Ok(ds)
    }

    /// Reads both files again and swaps them in.
    pub fn reload(&self) -> DashboardResult<Arc<Dataset>> {
        match Dataset::load(&self.dir) {
            Ok(ds) => {
                let ds = Arc::new(ds);
                *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&ds));
                info!(dir = %self.dir.display(), "reloaded rental data");
                Ok(ds)
            }
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "reload failed, keeping cached data");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::{DAY_FILE, HOUR_FILE};
    use std::fs;

    const DAY_CSV: &str = "dteday,season_label,year_label,cnt\n2011-01-01,Spring,2011,985\n";
    const HOUR_CSV: &str =
        "dteday,hr,tipe_hari,casual,registered,cnt\n2011-01-01,0,Akhir Pekan,3,13,16\n";

    fn write_data(dir: &Path, day: &str) {
        fs::write(dir.join(DAY_FILE), day).unwrap();
        fs::write(dir.join(HOUR_FILE), HOUR_CSV).unwrap();
    }

    #[test]
    fn get_loads_once_and_shares() {
        let tmp = tempfile::tempdir().unwrap();
        write_data(tmp.path(), DAY_CSV);
        let store = DataStore::new(tmp.path());
        assert!(!store.is_loaded());
        let a = store.get().unwrap();
        // the files are gone, the cache still answers
        fs::remove_file(tmp.path().join(DAY_FILE)).unwrap();
        let b = store.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(store.is_loaded());
    }

    #[test]
    fn reload_picks_up_new_rows() {
        let tmp = tempfile::tempdir().unwrap();
        write_data(tmp.path(), DAY_CSV);
        let store = DataStore::new(tmp.path());
        assert_eq!(store.get().unwrap().day.len(), 1);
        write_data(
            tmp.path(),
            "dteday,season_label,year_label,cnt\n2011-01-01,Spring,2011,985\n2011-01-02,Spring,2011,801\n",
        );
        assert_eq!(store.reload().unwrap().day.len(), 2);
        assert_eq!(store.get().unwrap().day.len(), 2);
    }

    #[test]
    fn failed_reload_keeps_cache() {
        let tmp = tempfile::tempdir().unwrap();
        write_data(tmp.path(), DAY_CSV);
        let store = DataStore::new(tmp.path());
        let before = store.get().unwrap();
        fs::remove_file(tmp.path().join(HOUR_FILE)).unwrap();
        assert!(matches!(
            store.reload(),
            Err(DashboardError::MissingInput { .. })
        ));
        assert!(Arc::ptr_eq(&before, &store.get().unwrap()));
    }

    #[test]
    fn get_without_files_is_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DataStore::new(tmp.path());
        assert!(matches!(store.get(), Err(DashboardError::MissingInput { .. })));
        assert!(!store.is_loaded());
    }
}
