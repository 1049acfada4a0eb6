//! Budget-vs-actual overview for one month
//!
//! Compares the fixed block against its budget, the variable block against
//! the sum of position budgets, and each position against its own budget.

use serde::Serialize;

use crate::models::{Money, MonthRecord, YearMonth};

use super::summary::{summarize_month, MonthSummary};

/// How an actual amount relates to its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetStatus {
    Over,
    Under,
    OnTarget,
}

impl BudgetStatus {
    /// Compare `actual` against `budget`
    ///
    /// An unset (zero) budget never flags a variance.
    pub fn of(actual: Money, budget: Money) -> Self {
        if budget <= Money::zero() || actual == budget {
            Self::OnTarget
        } else if actual > budget {
            Self::Over
        } else {
            Self::Under
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
            Self::OnTarget => "ok",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.marker())
    }
}

/// One budget line of the overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub label: String,
    pub budget: Money,
    pub actual: Money,
    pub status: BudgetStatus,
}

impl BudgetLine {
    fn new(label: impl Into<String>, budget: Money, actual: Money) -> Self {
        Self {
            label: label.into(),
            budget,
            actual,
            status: BudgetStatus::of(actual, budget),
        }
    }

    /// Budget left (negative when overspent)
    pub fn remaining(&self) -> Money {
        self.budget - self.actual
    }
}

/// Budget overview of a single month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBudgetOverview {
    pub period: YearMonth,
    pub fixed: BudgetLine,
    pub variable: BudgetLine,
    pub positions: Vec<BudgetLine>,
    pub summary: MonthSummary,
}

impl MonthBudgetOverview {
    pub fn generate(period: YearMonth, month: &MonthRecord) -> Self {
        let summary = summarize_month(month);
        let positions_actual = month.variable_positions.iter().map(|p| p.actual_amount).sum();

        Self {
            period,
            fixed: BudgetLine::new("Fixed costs", month.fixed_budget(), summary.fixed_actual_total),
            variable: BudgetLine::new(
                "Variable positions",
                month.variable_budget_amount(),
                positions_actual,
            ),
            positions: month
                .variable_positions
                .iter()
                .map(|p| BudgetLine::new(p.name.clone(), p.budget_amount, p.actual_amount))
                .collect(),
            summary,
        }
    }

    /// Format the overview and the month's fixed costs for terminal display
    pub fn format_terminal(&self, month: &MonthRecord, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Month Overview - {}\n", self.period));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<32} {:>12} {:>12} {:>12}\n",
            "Budget", "Budgeted", "Actual", "Status"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&budget_row(&self.fixed, ""));
        output.push_str(&budget_row(&self.variable, ""));
        for position in &self.positions {
            output.push_str(&budget_row(position, "  "));
        }

        if !month.fixed_costs.is_empty() {
            output.push_str("\nFixed costs\n");
            for entry in &month.fixed_costs {
                let marker = if entry.has_manual_actual() { " *" } else { "" };
                output.push_str(&format!(
                    "  {:<30} {:>12} {:>12}{}  {}\n",
                    entry.name, entry.planned_amount, entry.actual_amount, marker, entry.id
                ));
            }
        }

        let lines = [
            ("Legacy variable costs", &month.variable_costs),
            ("Misc costs", &month.misc_costs),
            ("Incomes", &month.incomes),
        ];
        for (title, entries) in lines {
            if entries.is_empty() {
                continue;
            }
            output.push_str(&format!("\n{}\n", title));
            for entry in entries {
                output.push_str(&format!(
                    "  {:<30} {:>12}  {}\n",
                    entry.description, entry.amount, entry.id
                ));
            }
        }

        let s = &self.summary;
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "Food {}  Going out {}  Fixed {}  Variable {}  Misc {}\n",
            s.food_total, s.going_out_total, s.fixed_actual_total, s.variable_total, s.misc_total
        ));
        output.push_str(&format!(
            "Total spent: {}   Income: {}   Balance: {}\n",
            s.grand_total.format_with_symbol(currency_symbol),
            s.income_total.format_with_symbol(currency_symbol),
            s.balance().format_with_symbol(currency_symbol)
        ));

        output
    }
}

fn budget_row(line: &BudgetLine, indent: &str) -> String {
    let width = 32 - indent.len();
    format!(
        "{}{:<width$} {:>12} {:>12} {:>12}\n",
        indent,
        line.label,
        line.budget,
        line.actual,
        line.status,
        width = width
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::factory::create_month;
    use crate::models::{FixedCostTemplate, VariableBudgetPosition};

    fn cents(value: i64) -> Money {
        Money::from_cents(value)
    }

    #[test]
    fn test_budget_status() {
        assert_eq!(BudgetStatus::of(cents(100), Money::zero()), BudgetStatus::OnTarget);
        assert_eq!(BudgetStatus::of(cents(101), cents(100)), BudgetStatus::Over);
        assert_eq!(BudgetStatus::of(cents(99), cents(100)), BudgetStatus::Under);
        assert_eq!(BudgetStatus::of(cents(100), cents(100)), BudgetStatus::OnTarget);
        assert_eq!(BudgetStatus::of(cents(5), cents(-10)), BudgetStatus::OnTarget);
    }

    #[test]
    fn test_overview_lines() {
        let rent = FixedCostTemplate::new("Miete", cents(90000));
        let mut month = create_month(2026, 6, &[rent]).unwrap();
        month.fixed_costs[0].actual_amount = cents(95000);
        month.variable_positions.push(VariableBudgetPosition::new(
            "Urlaub",
            cents(50000),
            cents(30000),
        ));
        month.recompute_variable_budget();

        let period = YearMonth::new(2026, 6).unwrap();
        let overview = MonthBudgetOverview::generate(period, &month);

        assert_eq!(overview.fixed.status, BudgetStatus::Over);
        assert_eq!(overview.fixed.remaining(), cents(-5000));
        assert_eq!(overview.variable.budget, cents(50000));
        assert_eq!(overview.variable.status, BudgetStatus::Under);
        assert_eq!(overview.positions.len(), 1);

        let output = overview.format_terminal(&month, "€");
        assert!(output.contains("Month Overview - 2026-06"));
        assert!(output.contains("Urlaub"));
        assert!(output.contains(" *"));
    }
}
