//! Year record repository for JSON storage
//!
//! Each year lives in its own file (`years/<year>.json`) so saving one
//! year never rewrites another.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::YearRecord;

use super::file_io::{read_json_required, remove_if_exists, write_json_atomic};

/// Repository for year record persistence
pub struct YearRepository {
    dir: PathBuf,
    pub(super) years: RwLock<BTreeMap<i32, YearRecord>>,
}

impl YearRepository {
    /// Create a new year repository rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            years: RwLock::new(BTreeMap::new()),
        }
    }

    /// Path of the file holding `year`
    pub fn file_for(&self, year: i32) -> PathBuf {
        year_file(&self.dir, year)
    }

    /// Load every year file from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let loaded = read_year_dir(&self.dir)?;

        let mut years = self
            .years
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *years = loaded;
        Ok(())
    }

    /// Get a year by number
    pub fn get(&self, year: i32) -> Result<Option<YearRecord>, LedgerError> {
        let years = self
            .years
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(years.get(&year).cloned())
    }

    /// Get all years, ascending
    pub fn get_all(&self) -> Result<Vec<YearRecord>, LedgerError> {
        let years = self
            .years
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(years.values().cloned().collect())
    }

    /// Write a year to disk and cache it
    ///
    /// The write lock is held across the file write so two saves of the
    /// same year cannot interleave.
    pub fn upsert(&self, record: &YearRecord) -> Result<(), LedgerError> {
        let mut years = self
            .years
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        write_json_atomic(self.file_for(record.year), record)?;
        years.insert(record.year, record.clone());
        Ok(())
    }

    /// Delete a year's file; returns whether it existed
    pub fn delete(&self, year: i32) -> Result<bool, LedgerError> {
        let mut years = self
            .years
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let existed_on_disk = remove_if_exists(&self.file_for(year))?;

        Ok(years.remove(&year).is_some() || existed_on_disk)
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let years = self
            .years
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(years.len())
    }
}

pub(super) fn year_file(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("{}.json", year))
}

/// Read all `<year>.json` files in a directory
pub(super) fn read_year_dir(dir: &Path) -> Result<BTreeMap<i32, YearRecord>, LedgerError> {
    let mut years = BTreeMap::new();

    if !dir.exists() {
        return Ok(years);
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        LedgerError::Storage(format!("Failed to read {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let entry = entry
            .map_err(|e| LedgerError::Storage(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();

        if path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let is_year_file = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map_or(false, |s| s.parse::<i32>().is_ok());
        if !is_year_file {
            continue;
        }

        let record: YearRecord = read_json_required(&path)?;
        if years.insert(record.year, record).is_some() {
            return Err(LedgerError::Storage(format!(
                "Duplicate year record in {}",
                path.display()
            )));
        }
    }

    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::factory::create_year;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, YearRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = YearRepository::new(temp_dir.path().join("years"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_writes_one_file_per_year() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert(&create_year(2025, &[], "").unwrap()).unwrap();
        repo.upsert(&create_year(2026, &[], "").unwrap()).unwrap();

        assert!(temp_dir.path().join("years").join("2025.json").exists());
        assert!(temp_dir.path().join("years").join("2026.json").exists());
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let year = create_year(2026, &[], "v1").unwrap();
        repo.upsert(&year).unwrap();

        let repo2 = YearRepository::new(temp_dir.path().join("years"));
        repo2.load().unwrap();

        assert_eq!(repo2.get(2026).unwrap(), Some(year));
        assert_eq!(repo2.get(2027).unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(&create_year(2026, &[], "").unwrap()).unwrap();

        assert!(repo.delete(2026).unwrap());
        assert!(!repo.file_for(2026).exists());
        assert!(!repo.delete(2026).unwrap());
    }

    #[test]
    fn test_load_ignores_foreign_files() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert(&create_year(2026, &[], "").unwrap()).unwrap();
        fs::write(temp_dir.path().join("years").join("notes.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("years").join("2027.json.tmp"), "garbage").unwrap();

        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let (temp_dir, repo) = create_test_repo();
        fs::create_dir_all(temp_dir.path().join("years")).unwrap();
        fs::write(temp_dir.path().join("years").join("2026.json"), "{").unwrap();

        assert!(matches!(repo.load(), Err(LedgerError::Storage(_))));
    }
}
