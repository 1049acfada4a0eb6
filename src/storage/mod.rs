//! Storage layer for the household ledger
//!
//! The ledger core only talks to the [`LedgerStore`] contract. Two backends
//! implement it: [`Storage`], which keeps one JSON file per year plus a
//! template file with atomic writes, and [`MemoryStore`], an in-process
//! backend for tests.

pub mod file_io;
pub mod init;
pub mod memory;
pub mod templates;
pub mod years;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::initialize_storage;
pub use memory::MemoryStore;
pub use templates::{TemplateRepository, TemplateState};
pub use years::YearRepository;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::{LedgerPaths, TEMPLATES_FILE_NAME, YEARS_DIR_NAME};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BackupPayload, FixedCostTemplate, YearRecord};

/// Persistence contract required by the ledger core
///
/// Every call either completes or fails with a `LedgerError::Storage`;
/// previously completed writes stay in place on failure.
pub trait LedgerStore: Send + Sync {
    /// All stored years, ascending by year
    fn list_years(&self) -> LedgerResult<Vec<YearRecord>>;

    fn get_year(&self, year: i32) -> LedgerResult<Option<YearRecord>>;

    fn save_year(&self, record: &YearRecord) -> LedgerResult<()>;

    /// Returns whether the year existed
    fn delete_year(&self, year: i32) -> LedgerResult<bool>;

    fn get_template_state(&self) -> LedgerResult<TemplateState>;

    /// Replace the template set; returns the new version token
    fn save_templates(&self, templates: &[FixedCostTemplate]) -> LedgerResult<String>;

    /// Snapshot the whole store
    fn create_backup(&self) -> LedgerResult<BackupPayload> {
        Ok(BackupPayload::new(
            self.list_years()?,
            self.get_template_state()?.templates,
        ))
    }

    /// Replace all years and the template set in one step
    ///
    /// Readers observe either the old or the new state, never a mix.
    fn restore_backup(&self, payload: &BackupPayload) -> LedgerResult<()>;

    /// Record an audit entry; backends without an audit log ignore it
    fn record_audit(&self, _entry: &AuditEntry) -> LedgerResult<()> {
        Ok(())
    }
}

/// Audit helpers available on every store, including `dyn LedgerStore`
pub trait AuditRecorder {
    fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()>;

    fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> LedgerResult<()>;

    fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()>;
}

impl<S: LedgerStore + ?Sized> AuditRecorder for S {
    fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.record_audit(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> LedgerResult<()> {
        self.record_audit(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.record_audit(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

/// A fresh version token for the template set
pub fn new_version_token() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// JSON file storage coordinator
pub struct Storage {
    paths: LedgerPaths,
    pub years: YearRepository,
    pub templates: TemplateRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Create a new Storage instance with audit logging enabled
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        Self::with_audit(paths, true)
    }

    /// Create a new Storage instance, choosing whether to write the audit log
    pub fn with_audit(paths: LedgerPaths, audit_enabled: bool) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            years: YearRepository::new(paths.years_dir()),
            templates: TemplateRepository::new(paths.templates_file()),
            audit: audit_enabled.then(|| AuditLogger::new(paths.audit_log())),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.years.load()?;
        self.templates.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.templates_file().exists()
    }

    /// Write the payload into a staging directory laid out like the data
    /// directory, then swap the directories
    fn swap_in_payload(&self, payload: &BackupPayload, state: &TemplateState) -> LedgerResult<()> {
        let staging = self.paths.restore_staging_dir();
        let previous = self.paths.restore_previous_dir();
        let data_dir = self.paths.data_dir();

        for dir in [&staging, &previous] {
            if dir.exists() {
                fs::remove_dir_all(dir).map_err(|e| {
                    LedgerError::Storage(format!("Failed to clear {}: {}", dir.display(), e))
                })?;
            }
        }

        let staged_years = staging.join(YEARS_DIR_NAME);
        fs::create_dir_all(&staged_years).map_err(|e| {
            LedgerError::Storage(format!("Failed to create {}: {}", staged_years.display(), e))
        })?;
        for year in &payload.years {
            write_json_atomic(years::year_file(&staged_years, year.year), year)?;
        }
        write_json_atomic(staging.join(TEMPLATES_FILE_NAME), state)?;

        if data_dir.exists() {
            fs::rename(&data_dir, &previous).map_err(|e| {
                LedgerError::Storage(format!("Failed to move current data aside: {}", e))
            })?;
        }

        if let Err(e) = fs::rename(&staging, &data_dir) {
            let rollback = if previous.exists() {
                fs::rename(&previous, &data_dir).err()
            } else {
                None
            };
            return Err(activation_failed(e, rollback, &previous));
        }

        if previous.exists() {
            let _ = fs::remove_dir_all(&previous);
        }

        Ok(())
    }
}

fn activation_failed(
    err: std::io::Error,
    rollback: Option<std::io::Error>,
    previous: &Path,
) -> LedgerError {
    let mut message = format!("Failed to activate restored data: {}", err);
    if let Some(rollback) = rollback {
        message.push_str(&format!(
            "; rolling back also failed ({}), previous data is at {}",
            rollback,
            previous.display()
        ));
    }
    LedgerError::Storage(message)
}

impl LedgerStore for Storage {
    fn list_years(&self) -> LedgerResult<Vec<YearRecord>> {
        self.years.get_all()
    }

    fn get_year(&self, year: i32) -> LedgerResult<Option<YearRecord>> {
        self.years.get(year)
    }

    fn save_year(&self, record: &YearRecord) -> LedgerResult<()> {
        self.years.upsert(record)
    }

    fn delete_year(&self, year: i32) -> LedgerResult<bool> {
        self.years.delete(year)
    }

    fn get_template_state(&self) -> LedgerResult<TemplateState> {
        self.templates.get()
    }

    fn save_templates(&self, templates: &[FixedCostTemplate]) -> LedgerResult<String> {
        let version = new_version_token();
        self.templates.save(templates, version.clone())?;
        Ok(version)
    }

    fn restore_backup(&self, payload: &BackupPayload) -> LedgerResult<()> {
        // Lock order: years, then templates
        let mut years = self
            .years
            .years
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut templates = self
            .templates
            .state
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let state = TemplateState {
            templates: payload.fixed_templates.clone(),
            version: new_version_token(),
        };
        self.swap_in_payload(payload, &state)?;

        *years = payload
            .years
            .iter()
            .map(|y| (y.year, y.clone()))
            .collect::<BTreeMap<_, _>>();
        *templates = state;
        Ok(())
    }

    fn record_audit(&self, entry: &AuditEntry) -> LedgerResult<()> {
        match &self.audit {
            Some(logger) => logger.log(entry),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::factory::create_year;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_templates_returns_fresh_version() {
        let (_temp_dir, storage) = create_test_storage();
        let templates = vec![FixedCostTemplate::new("Miete", Money::from_cents(90000))];

        let v1 = storage.save_templates(&templates).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let v2 = storage.save_templates(&templates).unwrap();

        assert_ne!(v1, v2);
        assert_eq!(storage.get_template_state().unwrap().version, v2);
    }

    #[test]
    fn test_restore_replaces_everything() {
        let (temp_dir, storage) = create_test_storage();
        storage.save_year(&create_year(2024, &[], "").unwrap()).unwrap();
        storage
            .save_templates(&[FixedCostTemplate::new("Alt", Money::from_cents(100))])
            .unwrap();

        let template = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let payload = BackupPayload::new(
            vec![create_year(2026, std::slice::from_ref(&template), "").unwrap()],
            vec![template.clone()],
        );
        storage.restore_backup(&payload).unwrap();

        let years: Vec<_> = storage.list_years().unwrap().iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2026]);
        assert_eq!(storage.get_template_state().unwrap().templates, vec![template]);

        assert!(!temp_dir.path().join("data").join("years").join("2024.json").exists());
        assert!(!temp_dir.path().join("data.restore").exists());
        assert!(!temp_dir.path().join("data.previous").exists());

        // A fresh instance sees the restored files
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.list_years().unwrap(), payload.years);
    }

    #[test]
    fn test_activation_failure_reports_failed_rollback() {
        let previous = Path::new("/data/.restore-previous");
        let denied = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");

        let err = activation_failed(denied(), None, previous);
        assert!(!err.to_string().contains("rolling back"));

        let err = activation_failed(denied(), Some(denied()), previous);
        assert!(matches!(err, LedgerError::Storage(_)));
        let message = err.to_string();
        assert!(message.contains("rolling back also failed"));
        assert!(message.contains("/data/.restore-previous"));
    }

    #[test]
    fn test_create_backup_snapshot() {
        let (_temp_dir, storage) = create_test_storage();
        storage.save_year(&create_year(2026, &[], "").unwrap()).unwrap();

        let payload = storage.create_backup().unwrap();
        assert_eq!(payload.years.len(), 1);
        assert!(payload.fixed_templates.is_empty());
    }

    #[test]
    fn test_record_audit_appends() {
        let (_temp_dir, storage) = create_test_storage();
        let entry = AuditEntry::delete(EntityType::Year, "2026", None, &serde_json::json!({}));

        storage.record_audit(&entry).unwrap();

        let logger = AuditLogger::new(storage.paths().audit_log());
        assert_eq!(logger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_audit_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::with_audit(paths.clone(), false).unwrap();
        let entry = AuditEntry::delete(EntityType::Year, "2026", None, &serde_json::json!({}));

        storage.record_audit(&entry).unwrap();
        assert!(!paths.audit_log().exists());
    }

    #[test]
    fn test_log_helpers_through_trait_object() {
        let (_temp_dir, storage) = create_test_storage();
        let store: &dyn LedgerStore = &storage;
        let before = serde_json::json!({"amount": 1});
        let after = serde_json::json!({"amount": 2});

        store
            .log_update(EntityType::Expense, "exp-1", None, &before, &after, None)
            .unwrap();

        let logger = AuditLogger::new(storage.paths().audit_log());
        let entries = logger.read_all().unwrap();
        assert_eq!(entries[0].entity_type, EntityType::Expense);
    }
}
