//! Year and month construction
//!
//! Builds calendar-correct months and seeds their fixed costs from the
//! current template set.

use chrono::Utc;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    DayEntry, FixedCostEntry, FixedCostTemplate, MonthRecord, YearMonth, YearRecord, YEAR_RANGE,
};

/// One `DayEntry` per calendar day of `(year, month)`
pub fn create_month_days(year: i32, month: u32) -> LedgerResult<Vec<DayEntry>> {
    let period = YearMonth::new(year, month).map_err(|e| LedgerError::Validation(e.to_string()))?;
    let days = period.days();
    if days.is_empty() {
        return Err(LedgerError::Validation(format!(
            "{} is outside the supported calendar",
            period
        )));
    }
    Ok(days.into_iter().map(DayEntry::new).collect())
}

/// Build a month whose fixed costs are snapshots of every template
pub fn create_month(
    year: i32,
    month: u32,
    templates: &[FixedCostTemplate],
) -> LedgerResult<MonthRecord> {
    let mut record = MonthRecord::new(month, create_month_days(year, month)?);
    record.fixed_costs = templates.iter().map(FixedCostEntry::from_template).collect();
    record.recompute_fixed_budget();
    record.recompute_variable_budget();
    Ok(record)
}

/// Build a full year seeded from the given templates
///
/// Does not check whether the year already exists; that is the caller's job.
pub fn create_year(
    year: i32,
    templates: &[FixedCostTemplate],
    schema_version: &str,
) -> LedgerResult<YearRecord> {
    if !YEAR_RANGE.contains(&year) {
        return Err(LedgerError::Validation(format!(
            "Year {} is outside {}..={}",
            year,
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        )));
    }

    let months = (1..=12)
        .map(|month| create_month(year, month, templates))
        .collect::<LedgerResult<Vec<_>>>()?;

    Ok(YearRecord {
        year,
        created_at: Utc::now(),
        template_schema_version_at_creation: schema_version.to_string(),
        months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_month_days_leap_february() {
        assert_eq!(create_month_days(2024, 2).unwrap().len(), 29);
        assert_eq!(create_month_days(2026, 2).unwrap().len(), 28);
    }

    #[test]
    fn test_month_days_match_calendar() {
        for month in 1..=12 {
            let days = create_month_days(2025, month).unwrap();
            let expected = YearMonth::new(2025, month).unwrap().day_count().unwrap();
            assert_eq!(days.len() as u32, expected);
            assert!(days.iter().all(|d| d.food_amount.is_zero()));
        }
    }

    #[test]
    fn test_month_days_invalid_month() {
        assert!(create_month_days(2026, 0).unwrap_err().is_validation());
        assert!(create_month_days(2026, 13).unwrap_err().is_validation());
    }

    #[test]
    fn test_create_year_from_templates() {
        let templates = vec![FixedCostTemplate::new("Miete", Money::from_cents(90000))];
        let year = create_year(2026, &templates, "v1").unwrap();

        assert_eq!(year.months.len(), 12);
        assert_eq!(year.template_schema_version_at_creation, "v1");
        for month in &year.months {
            assert_eq!(month.fixed_costs.len(), 1);
            assert_eq!(month.fixed_costs[0].actual_amount.cents(), 90000);
            assert_eq!(month.fixed_budget_amount, Some(Money::from_cents(90000)));
            assert!(month.variable_positions.is_empty());
            assert_eq!(month.variable_budget_amount(), Money::zero());
            assert!(month.misc_costs.is_empty());
            assert!(month.incomes.is_empty());
        }
        assert!(year.validate_shape().is_ok());
    }

    #[test]
    fn test_create_year_snapshots_are_distinct() {
        let templates = vec![FixedCostTemplate::new("Miete", Money::from_cents(90000))];
        let year = create_year(2026, &templates, "").unwrap();

        assert_ne!(year.months[0].fixed_costs[0].id, year.months[1].fixed_costs[0].id);
        assert_eq!(
            year.months[0].fixed_costs[0].template_id,
            year.months[1].fixed_costs[0].template_id
        );
    }

    #[test]
    fn test_create_year_without_templates() {
        let year = create_year(2024, &[], "").unwrap();
        assert!(year.months.iter().all(|m| m.fixed_costs.is_empty()));
        assert!(year
            .months
            .iter()
            .all(|m| m.fixed_budget_amount == Some(Money::zero())));
        assert_eq!(year.month(2).unwrap().days.len(), 29);
    }

    #[test]
    fn test_create_year_out_of_range() {
        assert!(create_year(0, &[], "").unwrap_err().is_validation());
        assert!(create_year(10000, &[], "").unwrap_err().is_validation());
    }
}
