//! Storage initialization
//!
//! Handles first-run setup: directories and an empty template set.

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

use super::file_io::write_json_atomic;
use super::templates::TemplateState;
use super::new_version_token;

/// Initialize storage for a fresh installation
///
/// Existing data is left alone.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        let state = TemplateState {
            templates: Vec::new(),
            version: new_version_token(),
        };
        write_json_atomic(paths.templates_file(), &state)?;
    }

    std::fs::create_dir_all(paths.years_dir())
        .map_err(|e| LedgerError::Io(format!("Failed to create years directory: {}", e)))?;

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.templates_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedCostTemplate, Money};
    use crate::storage::read_json_required;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.years_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = TemplateState {
            templates: vec![FixedCostTemplate::new("Miete", Money::from_cents(90000))],
            version: "custom".into(),
        };
        write_json_atomic(paths.templates_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let state: TemplateState = read_json_required(paths.templates_file()).unwrap();
        assert_eq!(state, custom);
    }
}
