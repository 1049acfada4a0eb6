//! Month records
//!
//! A month owns its days, its fixed-cost snapshots, its variable positions
//! and its free-form cost and income lines.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::expense::ExpenseEntry;
use super::ids::{ExpenseId, FixedCostId, PositionId, TemplateId};
use super::money::{deserialize_lenient, Money};
use super::position::VariableBudgetPosition;
use super::template::FixedCostEntry;

/// Food and going-out spend for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    pub iso_date: NaiveDate,
    #[serde(default)]
    pub food_amount: Money,
    #[serde(default)]
    pub going_out_amount: Money,
}

impl DayEntry {
    pub fn new(iso_date: NaiveDate) -> Self {
        Self {
            iso_date,
            food_amount: Money::zero(),
            going_out_amount: Money::zero(),
        }
    }
}

/// The list an expense line lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseBucket {
    /// Legacy free-form variable costs
    Variable,
    Misc,
    Income,
}

impl std::fmt::Display for ExpenseBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Misc => write!(f, "misc"),
            Self::Income => write!(f, "income"),
        }
    }
}

/// One month of a year record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    pub month_number: u32,

    #[serde(default)]
    pub days: Vec<DayEntry>,

    #[serde(default)]
    pub fixed_costs: Vec<FixedCostEntry>,

    /// Sum of planned fixed costs unless the user overrode it.
    /// `None` when an older writer left it missing or invalid.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub fixed_budget_amount: Option<Money>,

    #[serde(default)]
    pub variable_positions: Vec<VariableBudgetPosition>,

    /// Derived from `variable_positions`; the stored value is never trusted
    #[serde(default, deserialize_with = "deserialize_derived")]
    variable_budget_amount: Money,

    /// Legacy bucket of free-form variable costs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_costs: Vec<ExpenseEntry>,

    #[serde(default)]
    pub misc_costs: Vec<ExpenseEntry>,

    #[serde(default)]
    pub incomes: Vec<ExpenseEntry>,
}

fn deserialize_derived<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient(deserializer)?.unwrap_or_default())
}

impl MonthRecord {
    /// Create a month with the given days and no costs
    pub fn new(month_number: u32, days: Vec<DayEntry>) -> Self {
        Self {
            month_number,
            days,
            fixed_costs: Vec::new(),
            fixed_budget_amount: Some(Money::zero()),
            variable_positions: Vec::new(),
            variable_budget_amount: Money::zero(),
            variable_costs: Vec::new(),
            misc_costs: Vec::new(),
            incomes: Vec::new(),
        }
    }

    /// Sum of all fixed-cost planned amounts
    pub fn fixed_planned_total(&self) -> Money {
        self.fixed_costs.iter().map(|e| e.planned_amount).sum()
    }

    /// The fixed budget, falling back to the planned total when unset
    pub fn fixed_budget(&self) -> Money {
        self.fixed_budget_amount
            .unwrap_or_else(|| self.fixed_planned_total())
    }

    /// Reset the fixed budget to the sum of planned amounts
    pub fn recompute_fixed_budget(&mut self) {
        self.fixed_budget_amount = Some(self.fixed_planned_total());
    }

    /// Sum of all position budgets, derived from the current list
    pub fn variable_budget_amount(&self) -> Money {
        self.variable_positions.iter().map(|p| p.budget_amount).sum()
    }

    /// Bring the stored variable budget in line with the positions.
    /// Returns whether the stored value was stale.
    pub fn recompute_variable_budget(&mut self) -> bool {
        let derived = self.variable_budget_amount();
        let stale = self.variable_budget_amount != derived;
        self.variable_budget_amount = derived;
        stale
    }

    /// Whether a snapshot of this template is present
    pub fn has_template(&self, template_id: &TemplateId) -> bool {
        self.fixed_costs.iter().any(|e| &e.template_id == template_id)
    }

    pub fn fixed_cost(&self, id: &FixedCostId) -> Option<&FixedCostEntry> {
        self.fixed_costs.iter().find(|e| &e.id == id)
    }

    pub fn fixed_cost_mut(&mut self, id: &FixedCostId) -> Option<&mut FixedCostEntry> {
        self.fixed_costs.iter_mut().find(|e| &e.id == id)
    }

    pub fn position_mut(&mut self, id: &PositionId) -> Option<&mut VariableBudgetPosition> {
        self.variable_positions.iter_mut().find(|p| &p.id == id)
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayEntry> {
        self.days.iter_mut().find(|d| d.iso_date == date)
    }

    /// The list backing a bucket
    pub fn bucket(&self, bucket: ExpenseBucket) -> &Vec<ExpenseEntry> {
        match bucket {
            ExpenseBucket::Variable => &self.variable_costs,
            ExpenseBucket::Misc => &self.misc_costs,
            ExpenseBucket::Income => &self.incomes,
        }
    }

    pub fn bucket_mut(&mut self, bucket: ExpenseBucket) -> &mut Vec<ExpenseEntry> {
        match bucket {
            ExpenseBucket::Variable => &mut self.variable_costs,
            ExpenseBucket::Misc => &mut self.misc_costs,
            ExpenseBucket::Income => &mut self.incomes,
        }
    }

    /// Locate an expense line in any bucket
    pub fn find_expense(&self, id: &ExpenseId) -> Option<(ExpenseBucket, &ExpenseEntry)> {
        [
            ExpenseBucket::Variable,
            ExpenseBucket::Misc,
            ExpenseBucket::Income,
        ]
        .into_iter()
        .find_map(|bucket| {
            self.bucket(bucket)
                .iter()
                .find(|e| &e.id == id)
                .map(|e| (bucket, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedCostTemplate, ExpenseEntry};

    fn month_with_positions(budgets: &[i64]) -> MonthRecord {
        let mut month = MonthRecord::new(1, Vec::new());
        for (i, b) in budgets.iter().enumerate() {
            month.variable_positions.push(VariableBudgetPosition::new(
                format!("P{}", i),
                Money::from_cents(*b),
                Money::zero(),
            ));
        }
        month
    }

    #[test]
    fn test_variable_budget_follows_positions() {
        let mut month = month_with_positions(&[1000, 2500]);
        assert_eq!(month.variable_budget_amount().cents(), 3500);

        assert!(month.recompute_variable_budget());
        assert!(!month.recompute_variable_budget());
        assert_eq!(serde_json::to_value(&month).unwrap()["variableBudgetAmount"], 3500);

        month.variable_positions.pop();
        assert_eq!(month.variable_budget_amount().cents(), 1000);
    }

    #[test]
    fn test_fixed_budget_falls_back_to_planned_total() {
        let mut month = MonthRecord::new(1, Vec::new());
        let template = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        month.fixed_costs.push(FixedCostEntry::from_template(&template));
        month.fixed_budget_amount = None;

        assert_eq!(month.fixed_budget().cents(), 90000);

        month.fixed_budget_amount = Some(Money::from_cents(100000));
        assert_eq!(month.fixed_budget().cents(), 100000);
    }

    #[test]
    fn test_find_expense_across_buckets() {
        let mut month = MonthRecord::new(1, Vec::new());
        let income = ExpenseEntry::new("Gehalt", Money::from_cents(300000));
        let income_id = income.id.clone();
        month.incomes.push(income);

        let (bucket, entry) = month.find_expense(&income_id).unwrap();
        assert_eq!(bucket, ExpenseBucket::Income);
        assert_eq!(entry.amount.cents(), 300000);
        assert!(month.find_expense(&ExpenseId::new()).is_none());
    }

    #[test]
    fn test_legacy_month_shape() {
        let json = r#"{
            "monthNumber": 3,
            "days": [],
            "fixedCosts": [],
            "fixedBudgetAmount": "n/a",
            "variableBudgetAmount": 99999,
            "miscCosts": []
        }"#;
        let month: MonthRecord = serde_json::from_str(json).unwrap();

        assert_eq!(month.month_number, 3);
        assert!(month.fixed_budget_amount.is_none());
        assert!(month.incomes.is_empty());
        assert!(month.variable_positions.is_empty());
        assert_eq!(month.variable_budget_amount(), Money::zero());
    }

    #[test]
    fn test_serialized_shape() {
        let month = MonthRecord::new(2, Vec::new());
        let json = serde_json::to_value(&month).unwrap();

        assert_eq!(json["monthNumber"], 2);
        assert_eq!(json["fixedBudgetAmount"], 0);
        assert_eq!(json["variableBudgetAmount"], 0);
        assert!(json.get("variableCosts").is_none());
    }
}
