//! Backup restoration
//!
//! A backup is read and checked in full before the store is touched. Only
//! then are its years normalized and handed to the store, which swaps the
//! whole collection and the template set in one step.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{normalize_years, LedgerState, NormalizationReport};
use crate::models::BackupPayload;
use crate::storage::LedgerStore;

/// Handles restoring from backups
pub struct RestoreManager<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> RestoreManager<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Read, parse and validate a backup file
    ///
    /// Anything that does not have the backup shape is reported as
    /// `MalformedBackup`.
    pub fn read_payload(backup_path: &Path) -> LedgerResult<BackupPayload> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup file: {}", e)))?;

        let payload: BackupPayload = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::MalformedBackup(e.to_string()))?;

        payload.validate().map_err(LedgerError::MalformedBackup)?;
        Ok(payload)
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(backup_path: &Path) -> LedgerResult<ValidationResult> {
        let payload = Self::read_payload(backup_path)?;
        Ok(ValidationResult {
            exported_at: payload.exported_at,
            years: payload.years.iter().map(|y| y.year).collect(),
            template_count: payload.fixed_templates.len(),
        })
    }

    /// Restore from a backup file
    pub fn restore_from_file(&self, backup_path: &Path) -> LedgerResult<(LedgerState, RestoreResult)> {
        let payload = Self::read_payload(backup_path)?;
        self.restore_payload(payload)
    }

    /// Replace the store's contents with a payload
    ///
    /// Returns the fresh state built from the restored data.
    pub fn restore_payload(
        &self,
        mut payload: BackupPayload,
    ) -> LedgerResult<(LedgerState, RestoreResult)> {
        payload.validate().map_err(LedgerError::MalformedBackup)?;

        let normalization = normalize_years(payload.years.iter_mut());
        self.store.restore_backup(&payload)?;

        let version = self.store.get_template_state()?.version;
        let result = RestoreResult {
            backup_date: payload.exported_at,
            years_restored: payload.years.iter().map(|y| y.year).collect(),
            templates_restored: payload.fixed_templates.len(),
            normalization,
        };
        let state = LedgerState::from_parts(payload.fixed_templates, version, payload.years);

        Ok((state, result))
    }
}

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub backup_date: DateTime<Utc>,
    pub years_restored: Vec<i32>,
    pub templates_restored: usize,
    pub normalization: NormalizationReport,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} year(s) and {} template(s) from backup of {}",
            self.years_restored.len(),
            self.templates_restored,
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if self.normalization.repaired_anything() {
            summary.push_str(&format!(
                " ({} month(s) upgraded)",
                self.normalization.fixed_budgets_filled
                    + self.normalization.variable_budgets_corrected
            ));
        }
        summary
    }
}

/// Result of validating a backup
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub exported_at: DateTime<Utc>,
    pub years: Vec<i32>,
    pub template_count: usize,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        let years = if self.years.is_empty() {
            "no years".to_string()
        } else {
            self.years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Backup of {}: {}; {} template(s)",
            self.exported_at.format("%Y-%m-%d"),
            years,
            self.template_count
        )
    }
}
