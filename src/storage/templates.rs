//! Template set repository
//!
//! The global template set and its version token live in one file.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::FixedCostTemplate;

use super::file_io::{read_json, write_json_atomic};

/// Templates together with the token of their last save
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateState {
    #[serde(default)]
    pub templates: Vec<FixedCostTemplate>,
    /// Change marker, a fresh timestamp on every save
    #[serde(default)]
    pub version: String,
}

/// Repository for the template set
pub struct TemplateRepository {
    path: PathBuf,
    pub(super) state: RwLock<TemplateState>,
}

impl TemplateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(TemplateState::default()),
        }
    }

    /// Load the template set from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TemplateState = read_json(&self.path)?;

        let mut state = self
            .state
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *state = file_data;
        Ok(())
    }

    pub fn get(&self) -> Result<TemplateState, LedgerError> {
        let state = self
            .state
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(state.clone())
    }

    /// Replace the template set, stamping it with `version`
    pub fn save(&self, templates: &[FixedCostTemplate], version: String) -> Result<(), LedgerError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let next = TemplateState {
            templates: templates.to_vec(),
            version,
        };
        write_json_atomic(&self.path, &next)?;
        *state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_empty_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TemplateRepository::new(temp_dir.path().join("templates.json"));
        repo.load().unwrap();

        let state = repo.get().unwrap();
        assert!(state.templates.is_empty());
        assert!(state.version.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("templates.json");
        let repo = TemplateRepository::new(path.clone());

        let templates = vec![FixedCostTemplate::new("Miete", Money::from_cents(90000))];
        repo.save(&templates, "2026-01-01T00:00:00Z".into()).unwrap();

        let repo2 = TemplateRepository::new(path);
        repo2.load().unwrap();
        let state = repo2.get().unwrap();
        assert_eq!(state.templates, templates);
        assert_eq!(state.version, "2026-01-01T00:00:00Z");
    }
}
