//! Backup manager
//!
//! Writes dated JSON snapshots of the whole ledger into the backup
//! directory and prunes them according to the retention policy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::config::settings::BackupRetention;
use crate::error::{LedgerError, LedgerResult};
use crate::models::BackupPayload;

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Taken on the first of a month; kept under the monthly quota
    pub is_monthly: bool,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf, retention: BackupRetention) -> Self {
        Self {
            backup_dir,
            retention,
        }
    }

    /// Write a snapshot into the backup directory
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, payload: &BackupPayload) -> LedgerResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(filename);

        write_payload(&backup_path, payload)?;
        Ok(backup_path)
    }

    /// Create a backup and then enforce the retention policy
    pub fn create_backup_with_retention(
        &self,
        payload: &BackupPayload,
    ) -> LedgerResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup(payload)?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// List all backups, newest first
    pub fn list_backups(&self) -> LedgerResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LedgerError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Delete backups beyond the daily and monthly quotas
    pub fn enforce_retention(&self) -> LedgerResult<Vec<PathBuf>> {
        let (monthly, daily): (Vec<_>, Vec<_>) =
            self.list_backups()?.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| LedgerError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Resolve a backup by file name inside the backup directory
    pub fn get_backup(&self, filename: &str) -> Option<BackupInfo> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            parse_backup_info(&path)
        } else {
            None
        }
    }

    pub fn get_latest_backup(&self) -> LedgerResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Serialize a payload as pretty JSON to `path`
pub fn write_payload(path: &Path, payload: &BackupPayload) -> LedgerResult<()> {
    let json = serde_json::to_string_pretty(payload)
        .map_err(|e| LedgerError::Json(format!("Failed to serialize backup: {}", e)))?;

    fs::write(path, json)
        .map_err(|e| LedgerError::Io(format!("Failed to write backup file: {}", e)))
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        is_monthly: created_at.day() == 1,
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    let (date_part, time_part, millis) = match parts.as_slice() {
        [date, time] => (*date, *time, 0),
        [date, time, millis] => (*date, *time, millis.parse().ok()?),
        _ => return None,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let hour: u32 = time_part.get(0..2)?.parse().ok()?;
    let minute: u32 = time_part.get(2..4)?.parse().ok()?;
    let second: u32 = time_part.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let datetime = date.and_hms_milli_opt(hour, minute, second, millis)?;

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::factory::create_year;
    use crate::models::{FixedCostTemplate, Money};
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let retention = BackupRetention {
            daily_count: 3,
            monthly_count: 2,
        };
        let manager = BackupManager::new(temp_dir.path().join("backups"), retention);
        (manager, temp_dir)
    }

    fn sample_payload() -> BackupPayload {
        let rent = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let year = create_year(2026, std::slice::from_ref(&rent), "").unwrap();
        BackupPayload::new(vec![year], vec![rent])
    }

    #[test]
    fn test_create_backup_writes_payload() {
        let (manager, _temp) = create_test_manager();
        let payload = sample_payload();

        let path = manager.create_backup(&payload).unwrap();
        assert!(path.to_string_lossy().contains("backup-"));

        let contents = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(json["exportedAt"].is_string());
        assert_eq!(json["years"][0]["year"], 2026);
        assert_eq!(json["fixedTemplates"][0]["plannedAmount"], 90000);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _temp) = create_test_manager();
        let payload = sample_payload();

        manager.create_backup(&payload).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let newest = manager.create_backup(&payload).unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].path, newest);
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, newest);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, temp) = create_test_manager();
        let payload = sample_payload();
        fs::create_dir_all(temp.path().join("backups")).unwrap();

        // Five daily backups on distinct days, none on the first
        for day in 10..15 {
            let path = temp
                .path()
                .join("backups")
                .join(format!("backup-202605{}-120000-000.json", day));
            write_payload(&path, &payload).unwrap();
        }
        // Three monthly backups
        for month in 1..4 {
            let path = temp
                .path()
                .join("backups")
                .join(format!("backup-20260{}01-080000.json", month));
            write_payload(&path, &payload).unwrap();
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2 + 1);

        let remaining: Vec<_> = manager
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.filename)
            .collect();
        assert!(remaining.contains(&"backup-20260514-120000-000.json".to_string()));
        assert!(!remaining.contains(&"backup-20260510-120000-000.json".to_string()));
        assert!(!remaining.contains(&"backup-20260101-080000.json".to_string()));
    }

    #[test]
    fn test_ignores_foreign_files() {
        let (manager, temp) = create_test_manager();
        fs::create_dir_all(temp.path().join("backups")).unwrap();
        fs::write(temp.path().join("backups").join("notes.json"), "{}").unwrap();
        fs::write(temp.path().join("backups").join("backup-garbage.json"), "{}").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_backup("notes.json").is_none());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!((timestamp.year(), timestamp.month(), timestamp.day()), (2025, 11, 27));

        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251327-143022").is_none());
        assert!(parse_backup_timestamp("2025-11").is_none());
    }

    #[test]
    fn test_empty_backup_dir() {
        let (manager, _temp) = create_test_manager();
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_latest_backup().unwrap().is_none());
    }
}
