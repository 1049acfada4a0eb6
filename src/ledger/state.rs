//! Explicit application state
//!
//! The template set and every loaded year live in one [`LedgerState`] that
//! callers pass into each operation. Nothing here touches storage except
//! [`LedgerState::load`].

use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    BackupPayload, FixedCostTemplate, MonthRecord, TemplateId, YearMonth, YearRecord,
};
use crate::storage::LedgerStore;

use super::factory::create_year;
use super::normalize::{normalize_years, NormalizationReport};
use super::propagation::{
    propagate_created, propagate_deleted, propagate_updated, PropagationOutcome,
};

/// Templates plus all years, keyed by year number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub templates: Vec<FixedCostTemplate>,
    /// Change marker returned by the last template save
    pub template_version: String,
    pub years: BTreeMap<i32, YearRecord>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from already-normalized parts
    pub fn from_parts(
        templates: Vec<FixedCostTemplate>,
        template_version: String,
        years: Vec<YearRecord>,
    ) -> Self {
        Self {
            templates,
            template_version,
            years: years.into_iter().map(|y| (y.year, y)).collect(),
        }
    }

    /// Read everything from the store and normalize it. Years that needed
    /// repair are written back so the next load sees migrated data.
    pub fn load(store: &dyn LedgerStore) -> LedgerResult<(Self, NormalizationReport)> {
        let template_state = store.get_template_state()?;
        let mut years = store.list_years()?;

        let mut report = NormalizationReport::default();
        for year in &mut years {
            let repaired = normalize_years(std::iter::once(&mut *year));
            if repaired.repaired_anything() {
                store.save_year(year)?;
            }
            report += repaired;
        }

        let state = Self::from_parts(template_state.templates, template_state.version, years);
        Ok((state, report))
    }

    pub fn year(&self, year: i32) -> Option<&YearRecord> {
        self.years.get(&year)
    }

    pub fn require_year(&self, year: i32) -> LedgerResult<&YearRecord> {
        self.years
            .get(&year)
            .ok_or_else(|| LedgerError::year_not_found(year))
    }

    pub fn month(&self, period: YearMonth) -> LedgerResult<&MonthRecord> {
        self.require_year(period.year)?
            .month(period.month)
            .ok_or_else(|| LedgerError::month_not_found(period.to_string()))
    }

    pub fn month_mut(&mut self, period: YearMonth) -> LedgerResult<&mut MonthRecord> {
        self.years
            .get_mut(&period.year)
            .ok_or_else(|| LedgerError::year_not_found(period.year))?
            .month_mut(period.month)
            .ok_or_else(|| LedgerError::month_not_found(period.to_string()))
    }

    /// Create a year seeded from the current templates
    ///
    /// Refuses with `DuplicateYear` when the year is already present.
    pub fn create_year(&mut self, year: i32, schema_version: &str) -> LedgerResult<&YearRecord> {
        if self.years.contains_key(&year) {
            return Err(LedgerError::DuplicateYear(year));
        }

        let record = create_year(year, &self.templates, schema_version)?;
        Ok(self.years.entry(year).or_insert(record))
    }

    pub fn remove_year(&mut self, year: i32) -> Option<YearRecord> {
        self.years.remove(&year)
    }

    /// Resolve a user-supplied template reference (full id, short id or name)
    pub fn find_template(&self, reference: &str) -> LedgerResult<&FixedCostTemplate> {
        let reference = reference.trim();
        let mut matches = self
            .templates
            .iter()
            .filter(|t| t.id.matches(reference) || t.name.eq_ignore_ascii_case(reference));

        match (matches.next(), matches.next()) {
            (Some(template), None) => Ok(template),
            (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
                "Template reference '{}' is ambiguous",
                reference
            ))),
            (None, _) => Err(LedgerError::template_not_found(reference)),
        }
    }

    /// Add a template to the set and seed it from `effective` on
    pub fn add_template(
        &mut self,
        template: FixedCostTemplate,
        effective: YearMonth,
    ) -> PropagationOutcome {
        let outcome = propagate_created(self.years.values_mut(), &template, effective);
        self.templates.push(template);
        outcome
    }

    /// Replace a template in the set and push its values from `effective` on
    pub fn update_template(
        &mut self,
        template: FixedCostTemplate,
        effective: YearMonth,
    ) -> LedgerResult<PropagationOutcome> {
        let slot = self
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| LedgerError::template_not_found(template.id.to_string()))?;
        *slot = template;

        Ok(propagate_updated(self.years.values_mut(), slot, effective))
    }

    /// Drop a template from the set and from every month at or after
    /// `effective`; earlier months keep their snapshot
    pub fn remove_template(
        &mut self,
        template_id: &TemplateId,
        effective: YearMonth,
    ) -> LedgerResult<(FixedCostTemplate, PropagationOutcome)> {
        let index = self
            .templates
            .iter()
            .position(|t| &t.id == template_id)
            .ok_or_else(|| LedgerError::template_not_found(template_id.to_string()))?;
        let removed = self.templates.remove(index);

        let outcome = propagate_deleted(self.years.values_mut(), template_id, effective);
        Ok((removed, outcome))
    }

    /// Years named in a propagation outcome, for persisting
    pub fn touched_years<'a>(
        &'a self,
        outcome: &'a PropagationOutcome,
    ) -> impl Iterator<Item = &'a YearRecord> + 'a {
        outcome
            .touched_years
            .iter()
            .filter_map(move |year| self.years.get(year))
    }

    /// Snapshot the whole state for export
    pub fn to_backup(&self) -> BackupPayload {
        BackupPayload::new(self.years.values().cloned().collect(), self.templates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::{MemoryStore, LedgerStore};

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn state_with_rent() -> (LedgerState, TemplateId) {
        let mut state = LedgerState::new();
        let rent = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let id = rent.id.clone();
        state.templates.push(rent);
        state.create_year(2026, "v1").unwrap();
        (state, id)
    }

    #[test]
    fn test_create_year_refuses_duplicate() {
        let (mut state, _) = state_with_rent();
        let before = state.clone();

        let err = state.create_year(2026, "v2").unwrap_err();

        assert!(matches!(err, LedgerError::DuplicateYear(2026)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_create_year_seeds_templates() {
        let (state, id) = state_with_rent();
        let year = state.year(2026).unwrap();

        assert_eq!(year.template_schema_version_at_creation, "v1");
        assert!(year.months.iter().all(|m| m.has_template(&id)));
    }

    #[test]
    fn test_month_lookup_errors() {
        let (state, _) = state_with_rent();

        assert!(state.month(ym(2026, 2)).is_ok());
        assert!(state.month(ym(2027, 2)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_template_by_name_and_prefix() {
        let (state, id) = state_with_rent();

        assert_eq!(state.find_template("miete").unwrap().id, id);
        assert_eq!(state.find_template(&id.as_str()[..8]).unwrap().id, id);
        assert!(state.find_template("Strom").unwrap_err().is_not_found());
    }

    #[test]
    fn test_template_lifecycle_propagates() {
        let (mut state, id) = state_with_rent();
        state.create_year(2027, "v1").unwrap();

        let internet = FixedCostTemplate::new("Internet", Money::from_cents(3999));
        let outcome = state.add_template(internet, ym(2026, 12));
        assert_eq!(outcome.touched_years, vec![2026, 2027]);
        assert_eq!(outcome.touched_months, 13);

        let mut rent = state.find_template("Miete").unwrap().clone();
        rent.planned_amount = Money::from_cents(95000);
        let outcome = state.update_template(rent, ym(2027, 1)).unwrap();
        assert_eq!(outcome.touched_years, vec![2027]);
        assert_eq!(
            state.month(ym(2026, 12)).unwrap().fixed_budget(),
            Money::from_cents(93999)
        );
        assert_eq!(
            state.month(ym(2027, 1)).unwrap().fixed_budget(),
            Money::from_cents(98999)
        );

        let (removed, outcome) = state.remove_template(&id, ym(2027, 6)).unwrap();
        assert_eq!(removed.name, "Miete");
        assert_eq!(outcome.touched_months, 7);
        assert!(state.find_template("Miete").is_err());
        // Historical months keep the orphaned snapshot
        assert!(state.month(ym(2027, 5)).unwrap().has_template(&id));
    }

    #[test]
    fn test_update_unknown_template() {
        let (mut state, _) = state_with_rent();
        let stranger = FixedCostTemplate::new("Fremd", Money::zero());

        assert!(state
            .update_template(stranger, ym(2026, 1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_load_normalizes_and_heals_store() {
        let store = MemoryStore::new();
        let (state, _) = state_with_rent();
        let mut year = state.year(2026).unwrap().clone();
        year.months[0].fixed_budget_amount = None;
        store.save_year(&year).unwrap();

        let (loaded, report) = LedgerState::load(&store).unwrap();

        assert_eq!(report.fixed_budgets_filled, 1);
        assert_eq!(
            loaded.month(ym(2026, 1)).unwrap().fixed_budget_amount,
            Some(Money::from_cents(90000))
        );
        let healed = store.get_year(2026).unwrap().unwrap();
        assert!(healed.months[0].fixed_budget_amount.is_some());
    }

    #[test]
    fn test_load_leaves_clean_years_alone() {
        let store = MemoryStore::new();
        let (state, _) = state_with_rent();
        store.save_year(state.year(2026).unwrap()).unwrap();
        store.set_fail_writes(true);

        let (loaded, report) = LedgerState::load(&store).unwrap();

        assert_eq!(report.years, 1);
        assert!(!report.repaired_anything());
        assert_eq!(loaded.year(2026), state.year(2026));
    }

    #[test]
    fn test_load_writes_only_repaired_years() {
        let store = MemoryStore::new();
        let (mut state, _) = state_with_rent();
        state.create_year(2027, "v1").unwrap();
        let mut stale = state.year(2027).unwrap().clone();
        stale.months[3].fixed_budget_amount = None;
        store.save_year(state.year(2026).unwrap()).unwrap();
        store.save_year(&stale).unwrap();
        store.set_fail_writes(true);

        let err = LedgerState::load(&store).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));

        store.set_fail_writes(false);
        let (_, report) = LedgerState::load(&store).unwrap();
        assert_eq!(report.years, 2);
        assert_eq!(report.fixed_budgets_filled, 1);
    }

    #[test]
    fn test_backup_snapshot() {
        let (state, _) = state_with_rent();
        let payload = state.to_backup();

        assert_eq!(payload.years.len(), 1);
        assert_eq!(payload.fixed_templates, state.templates);
    }
}
