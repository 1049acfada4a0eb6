//! In-memory ledger store
//!
//! Keeps years and templates behind a single lock, so a restore swaps both
//! at once. Used by tests and anywhere a throwaway ledger is enough.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BackupPayload, FixedCostTemplate, YearRecord};

use super::templates::TemplateState;
use super::{new_version_token, LedgerStore};

#[derive(Debug, Default)]
struct Contents {
    years: BTreeMap<i32, YearRecord>,
    templates: TemplateState,
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: RwLock<Contents>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> LedgerResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("store is not writable".into()));
        }
        Ok(())
    }

    fn read(&self) -> LedgerResult<std::sync::RwLockReadGuard<'_, Contents>> {
        self.contents
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<std::sync::RwLockWriteGuard<'_, Contents>> {
        self.check_writable()?;
        self.contents
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

impl LedgerStore for MemoryStore {
    fn list_years(&self) -> LedgerResult<Vec<YearRecord>> {
        Ok(self.read()?.years.values().cloned().collect())
    }

    fn get_year(&self, year: i32) -> LedgerResult<Option<YearRecord>> {
        Ok(self.read()?.years.get(&year).cloned())
    }

    fn save_year(&self, record: &YearRecord) -> LedgerResult<()> {
        self.write()?.years.insert(record.year, record.clone());
        Ok(())
    }

    fn delete_year(&self, year: i32) -> LedgerResult<bool> {
        Ok(self.write()?.years.remove(&year).is_some())
    }

    fn get_template_state(&self) -> LedgerResult<TemplateState> {
        Ok(self.read()?.templates.clone())
    }

    fn save_templates(&self, templates: &[FixedCostTemplate]) -> LedgerResult<String> {
        let version = new_version_token();
        self.write()?.templates = TemplateState {
            templates: templates.to_vec(),
            version: version.clone(),
        };
        Ok(version)
    }

    fn restore_backup(&self, payload: &BackupPayload) -> LedgerResult<()> {
        let mut contents = self.write()?;
        contents.years = payload
            .years
            .iter()
            .map(|y| (y.year, y.clone()))
            .collect();
        contents.templates = TemplateState {
            templates: payload.fixed_templates.clone(),
            version: new_version_token(),
        };
        Ok(())
    }
}
