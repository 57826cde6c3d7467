//! Best-time persistence backed by a small TOML file.
//!
//! The file maps storage keys to decimal strings so several game variants can
//! share it:
//!
//! ```toml
//! [entries]
//! alienMazeBest = "12.4"
//! ```

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use alien_maze_core::{BestTimeStore, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoreFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Best-time store persisting one entry of a shared TOML file.
#[derive(Debug)]
pub(crate) struct FileBestTimeStore {
    path: PathBuf,
    key: String,
}

impl FileBestTimeStore {
    pub(crate) fn new(path: PathBuf, key: String) -> Self {
        Self { path, key }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Deletes the entry, reporting whether one existed.
    pub(crate) fn remove(&mut self) -> Result<bool, StoreError> {
        let Some(mut file) = self.read()? else {
            return Ok(false);
        };
        if file.entries.remove(&self.key).is_none() {
            return Ok(false);
        }
        self.write(&file)?;
        Ok(true)
    }

    fn read(&self) -> Result<Option<StoreFile>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        toml::from_str(&contents)
            .map(Some)
            .map_err(|error| StoreError::Unreadable {
                reason: error.to_string(),
            })
    }

    fn write(&self, file: &StoreFile) -> Result<(), StoreError> {
        let contents = toml::to_string(file).map_err(|error| StoreError::Unreadable {
            reason: error.to_string(),
        })?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl BestTimeStore for FileBestTimeStore {
    fn load(&self) -> Result<Option<f64>, StoreError> {
        let Some(file) = self.read()? else {
            return Ok(None);
        };
        file.entries
            .get(&self.key)
            .map(|value| StoreError::parse_seconds(value))
            .transpose()
    }

    fn save(&mut self, seconds: f64) -> Result<(), StoreError> {
        let mut file = match self.read() {
            Ok(file) => file.unwrap_or_default(),
            Err(StoreError::Unreadable { reason }) => {
                log::warn!(
                    "replacing unreadable best-time store {}: {reason}",
                    self.path.display()
                );
                StoreFile::default()
            }
            Err(error) => return Err(error),
        };
        let _ = file.entries.insert(self.key.clone(), seconds.to_string());
        self.write(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir, key: &str) -> FileBestTimeStore {
        FileBestTimeStore::new(dir.path().join("best.toml"), key.to_owned())
    }

    #[test]
    fn missing_file_means_no_best_time() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir, "alienMazeBest");

        assert_eq!(store.load().expect("readable"), None);
    }

    #[test]
    fn saved_times_are_read_back_as_decimal_strings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = store_in(&dir, "alienMazeBest");

        store.save(12.5).expect("writable");

        assert_eq!(store.load().expect("readable"), Some(12.5));
        let contents = fs::read_to_string(store.path()).expect("file written");
        assert!(contents.contains("alienMazeBest = \"12.5\""), "{contents}");
    }

    #[test]
    fn variants_keep_separate_entries_in_one_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut grid = store_in(&dir, "alienMazeBest");
        let mut path = store_in(&dir, "alienPathBest");

        grid.save(30.0).expect("writable");
        path.save(8.25).expect("writable");

        assert_eq!(grid.load().expect("readable"), Some(30.0));
        assert_eq!(path.load().expect("readable"), Some(8.25));
    }

    #[test]
    fn corrupt_entries_are_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = store_in(&dir, "alienMazeBest");
        fs::write(store.path(), "[entries]\nalienMazeBest = \"soon\"\n").expect("seeded");

        assert!(matches!(
            store.load(),
            Err(StoreError::Corrupt { value }) if value == "soon"
        ));
    }

    #[test]
    fn unreadable_files_are_replaced_on_save() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = store_in(&dir, "alienMazeBest");
        fs::write(store.path(), "this is not toml = = =").expect("seeded");

        assert!(matches!(store.load(), Err(StoreError::Unreadable { .. })));
        store.save(4.0).expect("writable");

        assert_eq!(store.load().expect("readable"), Some(4.0));
    }

    #[test]
    fn removing_an_entry_keeps_the_others() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut grid = store_in(&dir, "alienMazeBest");
        let mut path = store_in(&dir, "alienPathBest");
        grid.save(30.0).expect("writable");
        path.save(8.0).expect("writable");

        assert!(grid.remove().expect("writable"));
        assert!(!grid.remove().expect("writable"));

        assert_eq!(grid.load().expect("readable"), None);
        assert_eq!(path.load().expect("readable"), Some(8.0));
        assert_eq!(grid.key(), "alienMazeBest");
    }
}
