//! Load-time normalization of year records
//!
//! Records read from storage or from an imported backup may come from an
//! older schema. Missing lists are already defaulted during
//! deserialization; this pass fills a missing fixed budget and always
//! re-derives the variable budget.

use crate::models::{MonthRecord, YearRecord};

/// What a normalization pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub years: usize,
    pub months: usize,
    /// Months whose fixed budget was missing or invalid
    pub fixed_budgets_filled: usize,
    /// Months whose stored variable budget disagreed with its positions
    pub variable_budgets_corrected: usize,
}

impl NormalizationReport {
    /// Whether any month needed repair
    pub fn repaired_anything(&self) -> bool {
        self.fixed_budgets_filled > 0 || self.variable_budgets_corrected > 0
    }
}

impl std::ops::AddAssign for NormalizationReport {
    fn add_assign(&mut self, other: Self) {
        self.years += other.years;
        self.months += other.months;
        self.fixed_budgets_filled += other.fixed_budgets_filled;
        self.variable_budgets_corrected += other.variable_budgets_corrected;
    }
}

/// Normalize one month, returning `(fixed_filled, variable_corrected)`
pub fn normalize_month(month: &mut MonthRecord) -> (bool, bool) {
    let fixed_filled = month.fixed_budget_amount.is_none();
    if fixed_filled {
        month.recompute_fixed_budget();
    }

    let variable_corrected = month.recompute_variable_budget();

    (fixed_filled, variable_corrected)
}

/// Normalize every month of every given year
pub fn normalize_years<'a, I>(years: I) -> NormalizationReport
where
    I: IntoIterator<Item = &'a mut YearRecord>,
{
    let mut report = NormalizationReport::default();

    for year in years {
        report.years += 1;
        for month in &mut year.months {
            report.months += 1;
            let (fixed_filled, variable_corrected) = normalize_month(month);
            if fixed_filled {
                report.fixed_budgets_filled += 1;
            }
            if variable_corrected {
                report.variable_budgets_corrected += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::factory::create_year;
    use crate::models::{FixedCostTemplate, Money, VariableBudgetPosition};

    fn legacy_year_json() -> serde_json::Value {
        let template = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let year = create_year(2025, &[template], "").unwrap();
        let mut json = serde_json::to_value(&year).unwrap();

        for month in json["months"].as_array_mut().unwrap() {
            let month = month.as_object_mut().unwrap();
            month.remove("incomes");
            month.remove("variablePositions");
            month.insert("fixedBudgetAmount".into(), serde_json::json!("oops"));
            month.insert("variableBudgetAmount".into(), serde_json::json!(4711));
        }
        json
    }

    #[test]
    fn test_normalizes_legacy_records() {
        let mut year: YearRecord = serde_json::from_value(legacy_year_json()).unwrap();

        let report = normalize_years(std::iter::once(&mut year));

        assert_eq!(report.years, 1);
        assert_eq!(report.months, 12);
        assert_eq!(report.fixed_budgets_filled, 12);
        assert_eq!(report.variable_budgets_corrected, 12);
        for month in &year.months {
            assert!(month.incomes.is_empty());
            assert!(month.variable_positions.is_empty());
            assert_eq!(month.fixed_budget_amount, Some(Money::from_cents(90000)));
            assert_eq!(month.variable_budget_amount(), Money::zero());
        }
    }

    #[test]
    fn test_keeps_present_fixed_budget() {
        let mut year = create_year(2026, &[], "").unwrap();
        year.months[0].fixed_budget_amount = Some(Money::from_cents(55555));

        let report = normalize_years(std::iter::once(&mut year));

        assert_eq!(report.fixed_budgets_filled, 0);
        assert_eq!(year.months[0].fixed_budget_amount, Some(Money::from_cents(55555)));
    }

    #[test]
    fn test_variable_budget_always_derived() {
        let mut year = create_year(2026, &[], "").unwrap();
        let month = &mut year.months[5];
        month.variable_positions = vec![
            VariableBudgetPosition::new("Urlaub", Money::from_cents(40000), Money::zero()),
            VariableBudgetPosition::new("Kleidung", Money::from_cents(7500), Money::zero()),
        ];

        let report = normalize_years(std::iter::once(&mut year));

        assert_eq!(report.variable_budgets_corrected, 1);
        assert_eq!(year.months[5].variable_budget_amount().cents(), 47500);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut year: YearRecord = serde_json::from_value(legacy_year_json()).unwrap();
        normalize_years(std::iter::once(&mut year));
        let once = year.clone();

        let report = normalize_years(std::iter::once(&mut year));

        assert!(!report.repaired_anything());
        assert_eq!(year, once);
    }
}
