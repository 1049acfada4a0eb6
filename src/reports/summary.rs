//! Cost summaries
//!
//! Pure read-side aggregation over normalized months and years. Income is
//! reported next to the totals and never counted in `grand_total`.

use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

use crate::models::{Money, MonthRecord, YearRecord};

/// Category totals for one month, or a fold over several
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub food_total: Money,
    pub going_out_total: Money,
    pub fixed_actual_total: Money,
    /// Legacy variable costs plus the positions' actual amounts
    pub variable_total: Money,
    pub misc_total: Money,
    pub grand_total: Money,
    pub income_total: Money,
}

impl MonthSummary {
    /// Income minus everything spent
    pub fn balance(&self) -> Money {
        self.income_total - self.grand_total
    }
}

impl Add for MonthSummary {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            food_total: self.food_total + other.food_total,
            going_out_total: self.going_out_total + other.going_out_total,
            fixed_actual_total: self.fixed_actual_total + other.fixed_actual_total,
            variable_total: self.variable_total + other.variable_total,
            misc_total: self.misc_total + other.misc_total,
            grand_total: self.grand_total + other.grand_total,
            income_total: self.income_total + other.income_total,
        }
    }
}

impl Sum for MonthSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

pub fn summarize_month(month: &MonthRecord) -> MonthSummary {
    let food_total = month.days.iter().map(|d| d.food_amount).sum();
    let going_out_total = month.days.iter().map(|d| d.going_out_amount).sum();
    let fixed_actual_total = month.fixed_costs.iter().map(|e| e.actual_amount).sum();
    let variable_total = month
        .variable_costs
        .iter()
        .map(|e| e.amount)
        .chain(month.variable_positions.iter().map(|p| p.actual_amount))
        .sum();
    let misc_total = month.misc_costs.iter().map(|e| e.amount).sum();
    let income_total = month.incomes.iter().map(|e| e.amount).sum();

    MonthSummary {
        food_total,
        going_out_total,
        fixed_actual_total,
        variable_total,
        misc_total,
        grand_total: food_total + going_out_total + fixed_actual_total + variable_total + misc_total,
        income_total,
    }
}

/// Field-wise sum over all months of a year
pub fn summarize_year(year: &YearRecord) -> MonthSummary {
    year.months.iter().map(summarize_month).sum()
}

/// One summary per month, ascending by month number
pub fn summarize_year_by_month(year: &YearRecord) -> Vec<(u32, MonthSummary)> {
    year.months_sorted()
        .into_iter()
        .map(|m| (m.month_number, summarize_month(m)))
        .collect()
}

/// Monthly breakdown plus total for one year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearReport {
    pub year: i32,
    pub months: Vec<(u32, MonthSummary)>,
    pub total: MonthSummary,
}

impl YearReport {
    pub fn generate(year: &YearRecord) -> Self {
        let months = summarize_year_by_month(year);
        let total = months.iter().map(|(_, s)| *s).sum();
        Self {
            year: year.year,
            months,
            total,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Year Summary - {}\n", self.year));
        output.push_str(&"=".repeat(104));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}\n",
            "Month", "Food", "Going out", "Fixed", "Variable", "Misc", "Total", "Income"
        ));
        output.push_str(&"-".repeat(104));
        output.push('\n');

        for (month_number, summary) in &self.months {
            output.push_str(&summary_row(&format!("{:02}", month_number), summary));
        }

        output.push_str(&"-".repeat(104));
        output.push('\n');
        output.push_str(&summary_row("TOTAL", &self.total));
        output.push_str(&format!(
            "\nSpent {} of {} income\n",
            self.total.grand_total.format_with_symbol(currency_symbol),
            self.total.income_total.format_with_symbol(currency_symbol)
        ));

        output
    }
}

fn summary_row(label: &str, summary: &MonthSummary) -> String {
    format!(
        "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}\n",
        label,
        summary.food_total,
        summary.going_out_total,
        summary.fixed_actual_total,
        summary.variable_total,
        summary.misc_total,
        summary.grand_total,
        summary.income_total
    )
}
