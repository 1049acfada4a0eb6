//! Template propagation
//!
//! Carries a template's creation, edit or deletion into every month at or
//! after an effective month. Earlier months keep their snapshot untouched.
//! Each operation is idempotent: running it again with the same effective
//! month converges to the same entries.

use crate::models::{FixedCostEntry, FixedCostTemplate, TemplateId, YearMonth, YearRecord};

/// Which months a propagation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    /// Years with at least one changed month, ascending
    pub touched_years: Vec<i32>,
    /// Number of months changed across all years
    pub touched_months: usize,
}

impl PropagationOutcome {
    fn record(&mut self, year: i32, months: usize) {
        if months > 0 {
            self.touched_years.push(year);
            self.touched_months += months;
        }
    }

    fn finish(mut self) -> Self {
        self.touched_years.sort_unstable();
        self.touched_years.dedup();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.touched_months == 0
    }
}

/// Seed a new template into every month at or after `effective` that does
/// not carry it yet
pub fn propagate_created<'a, I>(
    years: I,
    template: &FixedCostTemplate,
    effective: YearMonth,
) -> PropagationOutcome
where
    I: IntoIterator<Item = &'a mut YearRecord>,
{
    let mut outcome = PropagationOutcome::default();

    for year in years {
        let year_number = year.year;
        let mut touched = 0;

        for month in year
            .months
            .iter_mut()
            .filter(|m| effective.includes(year_number, m.month_number))
        {
            if month.has_template(&template.id) {
                continue;
            }
            month.fixed_costs.push(FixedCostEntry::from_template(template));
            month.recompute_fixed_budget();
            touched += 1;
        }

        outcome.record(year_number, touched);
    }

    outcome.finish()
}

/// Push a template's new name and planned amount into matching entries at
/// or after `effective`
///
/// Untouched actual amounts follow the new plan; recorded deviations stay.
pub fn propagate_updated<'a, I>(
    years: I,
    template: &FixedCostTemplate,
    effective: YearMonth,
) -> PropagationOutcome
where
    I: IntoIterator<Item = &'a mut YearRecord>,
{
    let mut outcome = PropagationOutcome::default();

    for year in years {
        let year_number = year.year;
        let mut touched = 0;

        for month in year
            .months
            .iter_mut()
            .filter(|m| effective.includes(year_number, m.month_number))
        {
            let mut matched = false;
            for entry in month
                .fixed_costs
                .iter_mut()
                .filter(|e| e.template_id == template.id)
            {
                entry.apply_template(template);
                matched = true;
            }
            if matched {
                month.recompute_fixed_budget();
                touched += 1;
            }
        }

        outcome.record(year_number, touched);
    }

    outcome.finish()
}

/// Drop a template's entries from every month at or after `effective`
pub fn propagate_deleted<'a, I>(
    years: I,
    template_id: &TemplateId,
    effective: YearMonth,
) -> PropagationOutcome
where
    I: IntoIterator<Item = &'a mut YearRecord>,
{
    let mut outcome = PropagationOutcome::default();

    for year in years {
        let year_number = year.year;
        let mut touched = 0;

        for month in year
            .months
            .iter_mut()
            .filter(|m| effective.includes(year_number, m.month_number))
        {
            let before = month.fixed_costs.len();
            month.fixed_costs.retain(|e| &e.template_id != template_id);
            if month.fixed_costs.len() != before {
                month.recompute_fixed_budget();
                touched += 1;
            }
        }

        outcome.record(year_number, touched);
    }

    outcome.finish()
}
