//! Backup system for the household ledger
//!
//! - `BackupManager`: writes dated snapshots and applies the retention policy
//! - `RestoreManager`: validates a snapshot and swaps it into the store
//!
//! # Backup Format
//!
//! A backup file is the JSON form of [`BackupPayload`](crate::models::BackupPayload):
//! `{ exportedAt, years, fixedTemplates }`. Years inside may use an older
//! month shape; they are normalized on restore.
//!
//! # Retention Policy
//!
//! By default the system keeps 30 daily backups and 12 monthly backups
//! (backups taken on the first of a month).

mod manager;
mod restore;

pub use manager::{write_payload, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
