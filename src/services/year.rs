//! Year service
//!
//! Creates and deletes whole year records.

use serde_json::json;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::LedgerState;
use crate::models::{YearRecord, YEAR_RANGE};
use crate::storage::{AuditRecorder, LedgerStore};

/// Service for year management
pub struct YearService<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> YearService<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Create a year seeded from the current templates and persist it
    ///
    /// Nothing is kept in memory when the store refuses the write.
    pub fn create_year(&self, state: &mut LedgerState, year: i32) -> LedgerResult<YearRecord> {
        if !YEAR_RANGE.contains(&year) {
            return Err(LedgerError::Validation(format!(
                "Year must be between {} and {}",
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            )));
        }

        let version = state.template_version.clone();
        let record = state.create_year(year, &version)?.clone();

        if let Err(e) = self.store.save_year(&record) {
            state.remove_year(year);
            return Err(e);
        }

        self.store.log_create(
            EntityType::Year,
            year.to_string(),
            None,
            &json!({
                "year": year,
                "fixedCostsPerMonth": state.templates.len(),
                "templateSchemaVersionAtCreation": version,
            }),
        )?;

        Ok(record)
    }

    /// Delete a year from storage and state
    pub fn delete_year(&self, state: &mut LedgerState, year: i32) -> LedgerResult<YearRecord> {
        state.require_year(year)?;
        self.store.delete_year(year)?;

        let removed = state
            .remove_year(year)
            .ok_or_else(|| LedgerError::year_not_found(year))?;

        self.store.log_delete(
            EntityType::Year,
            year.to_string(),
            None,
            &json!({ "year": year, "createdAt": removed.created_at }),
        )?;

        Ok(removed)
    }

    pub fn get_year<'s>(&self, state: &'s LedgerState, year: i32) -> LedgerResult<&'s YearRecord> {
        state.require_year(year)
    }

    /// All known year numbers, ascending
    pub fn list_years(&self, state: &LedgerState) -> Vec<i32> {
        state.years.keys().copied().collect()
    }
}
