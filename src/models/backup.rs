//! Full-state snapshot used for export and import

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::template::FixedCostTemplate;
use super::year::YearRecord;

/// Every year plus the template set, as written to a backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub exported_at: DateTime<Utc>,
    pub years: Vec<YearRecord>,
    pub fixed_templates: Vec<FixedCostTemplate>,
}

impl BackupPayload {
    pub fn new(years: Vec<YearRecord>, fixed_templates: Vec<FixedCostTemplate>) -> Self {
        Self {
            exported_at: Utc::now(),
            years,
            fixed_templates,
        }
    }

    /// Check the whole payload before anything is written
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let mut years = HashSet::new();
        for year in &self.years {
            if !years.insert(year.year) {
                return Err(format!("year {} appears more than once", year.year));
            }
            year.validate_shape()
                .map_err(|e| format!("year {}: {}", year.year, e))?;
        }

        let mut template_ids = HashSet::new();
        for template in &self.fixed_templates {
            if !template_ids.insert(&template.id) {
                return Err(format!("template {} appears more than once", template.id));
            }
            template
                .validate()
                .map_err(|e| format!("template {}: {}", template.id, e))?;
            if !template.planned_amount.is_storable() {
                return Err(format!("template {}: amount is out of range", template.id));
            }
        }

        Ok(())
    }
}
