//! Backup service
//!
//! Snapshots, export to a chosen file, and import with an optional safety
//! backup of the current data.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::audit::EntityType;
use crate::backup::{write_payload, BackupInfo, BackupManager, RestoreManager, RestoreResult};
use crate::error::LedgerResult;
use crate::ledger::LedgerState;
use crate::models::BackupPayload;
use crate::storage::{AuditRecorder, LedgerStore};

/// Service for backup, export and import
pub struct BackupService<'a> {
    store: &'a dyn LedgerStore,
    manager: BackupManager,
}

impl<'a> BackupService<'a> {
    pub fn new(store: &'a dyn LedgerStore, manager: BackupManager) -> Self {
        Self { store, manager }
    }

    /// Snapshot the store into the backup directory and prune old backups
    pub fn create(&self) -> LedgerResult<(PathBuf, Vec<PathBuf>)> {
        let payload = self.store.create_backup()?;
        let (path, deleted) = self.manager.create_backup_with_retention(&payload)?;

        self.store.log_create(
            EntityType::Backup,
            path.display().to_string(),
            None,
            &json!({
                "years": payload.years.iter().map(|y| y.year).collect::<Vec<_>>(),
                "templates": payload.fixed_templates.len(),
            }),
        )?;

        Ok((path, deleted))
    }

    pub fn manager(&self) -> &BackupManager {
        &self.manager
    }

    pub fn list(&self) -> LedgerResult<Vec<BackupInfo>> {
        self.manager.list_backups()
    }

    pub fn prune(&self) -> LedgerResult<Vec<PathBuf>> {
        self.manager.enforce_retention()
    }

    /// The current state as a backup payload stamped now
    pub fn export(&self, state: &LedgerState) -> BackupPayload {
        state.to_backup()
    }

    /// Export the current state to `path`
    pub fn export_to(&self, state: &LedgerState, path: &Path) -> LedgerResult<BackupPayload> {
        let payload = self.export(state);
        write_payload(path, &payload)?;
        Ok(payload)
    }

    /// Replace everything with the contents of a backup file
    ///
    /// The file is validated before anything else happens. With
    /// `safety_backup` the current data is snapshotted first.
    pub fn import(
        &self,
        state: &mut LedgerState,
        path: &Path,
        safety_backup: bool,
    ) -> LedgerResult<(RestoreResult, Option<PathBuf>)> {
        let payload = RestoreManager::read_payload(path)?;

        let safety_path = if safety_backup {
            Some(self.manager.create_backup(&self.store.create_backup()?)?)
        } else {
            None
        };

        let (restored, result) = RestoreManager::new(self.store).restore_payload(payload)?;
        *state = restored;

        self.store.log_update(
            EntityType::Backup,
            path.display().to_string(),
            Some("import".into()),
            &json!({ "safetyBackup": safety_path }),
            &json!({
                "years": result.years_restored,
                "templates": result.templates_restored,
            }),
            Some(result.summary()),
        )?;

        Ok((result, safety_path))
    }
}
