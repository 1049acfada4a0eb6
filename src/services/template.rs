//! Template service
//!
//! Wraps the propagation engine: validates input, updates the state,
//! saves the template set and every year a change reached, then audits.

use crate::audit::{generate_diff, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{LedgerState, PropagationOutcome};
use crate::models::{FixedCostTemplate, Money, YearMonth};
use crate::storage::{AuditRecorder, LedgerStore};

/// Service for fixed-cost template management
pub struct TemplateService<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> TemplateService<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Create a template and seed it into every month from `effective` on
    pub fn create(
        &self,
        state: &mut LedgerState,
        name: &str,
        planned_amount: Money,
        effective: YearMonth,
    ) -> LedgerResult<(FixedCostTemplate, PropagationOutcome)> {
        let template = FixedCostTemplate::new(name, planned_amount);
        template
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let outcome = state.add_template(template.clone(), effective);
        self.persist(state, &outcome)?;

        self.store.log_create(
            EntityType::Template,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        Ok((template, outcome))
    }

    /// Rename and/or re-price a template from `effective` on
    pub fn update(
        &self,
        state: &mut LedgerState,
        reference: &str,
        name: Option<&str>,
        planned_amount: Option<Money>,
        effective: YearMonth,
    ) -> LedgerResult<(FixedCostTemplate, PropagationOutcome)> {
        if name.is_none() && planned_amount.is_none() {
            return Err(LedgerError::Validation(
                "Nothing to update: give a new name or amount".into(),
            ));
        }

        let before = state.find_template(reference)?.clone();
        let mut updated = before.clone();
        if let Some(name) = name {
            updated.name = name.trim().to_string();
        }
        if let Some(amount) = planned_amount {
            updated.planned_amount = amount;
        }
        updated
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let outcome = state.update_template(updated.clone(), effective)?;
        self.persist(state, &outcome)?;

        let diff = generate_diff(
            &serde_json::to_value(&before)?,
            &serde_json::to_value(&updated)?,
        );
        self.store.log_update(
            EntityType::Template,
            updated.id.to_string(),
            Some(updated.name.clone()),
            &before,
            &updated,
            diff,
        )?;

        Ok((updated, outcome))
    }

    /// Delete a template and its entries from `effective` on
    pub fn delete(
        &self,
        state: &mut LedgerState,
        reference: &str,
        effective: YearMonth,
    ) -> LedgerResult<(FixedCostTemplate, PropagationOutcome)> {
        let id = state.find_template(reference)?.id.clone();
        let (removed, outcome) = state.remove_template(&id, effective)?;
        self.persist(state, &outcome)?;

        self.store.log_delete(
            EntityType::Template,
            removed.id.to_string(),
            Some(removed.name.clone()),
            &removed,
        )?;

        Ok((removed, outcome))
    }

    pub fn list<'s>(&self, state: &'s LedgerState) -> &'s [FixedCostTemplate] {
        &state.templates
    }

    /// Save the template set, then each touched year in ascending order
    fn persist(&self, state: &mut LedgerState, outcome: &PropagationOutcome) -> LedgerResult<()> {
        state.template_version = self.store.save_templates(&state.templates)?;
        for year in state.touched_years(outcome) {
            self.store.save_year(year)?;
        }
        Ok(())
    }
}
