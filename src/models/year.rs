//! Year records
//!
//! The unit of persistence: one record per calendar year, owning exactly
//! twelve months.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::money::Money;
use super::month::MonthRecord;
use super::period::YearMonth;

/// Shape violations of a year record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearShapeError {
    MonthCount(usize),
    InvalidMonthNumber(u32),
    DuplicateMonth(u32),
    DaysMismatch { month: u32 },
    YearOutOfRange(i32),
    InvalidAmount { month: u32, field: &'static str },
}

impl std::fmt::Display for YearShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MonthCount(n) => write!(f, "expected 12 months, found {}", n),
            Self::InvalidMonthNumber(m) => write!(f, "invalid month number {}", m),
            Self::DuplicateMonth(m) => write!(f, "month {} appears more than once", m),
            Self::DaysMismatch { month } => {
                write!(f, "days of month {} do not match the calendar", month)
            }
            Self::YearOutOfRange(y) => write!(f, "year {} is out of range", y),
            Self::InvalidAmount { month, field } => write!(
                f,
                "month {} has a negative or oversized {}",
                month, field
            ),
        }
    }
}

impl std::error::Error for YearShapeError {}

/// Supported calendar years
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// A full year of monthly records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: i32,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Template version token current when the year was created
    #[serde(default)]
    pub template_schema_version_at_creation: String,

    pub months: Vec<MonthRecord>,
}

impl YearRecord {
    pub fn month(&self, month_number: u32) -> Option<&MonthRecord> {
        self.months.iter().find(|m| m.month_number == month_number)
    }

    pub fn month_mut(&mut self, month_number: u32) -> Option<&mut MonthRecord> {
        self.months
            .iter_mut()
            .find(|m| m.month_number == month_number)
    }

    /// Months ordered by month number, whatever the stored order
    pub fn months_sorted(&self) -> Vec<&MonthRecord> {
        let mut months: Vec<_> = self.months.iter().collect();
        months.sort_by_key(|m| m.month_number);
        months
    }

    /// Check the structural invariants: twelve unique months whose day
    /// sets equal the calendar days of that month, and every stored amount
    /// within `0..=Money::MAX`
    pub fn validate_shape(&self) -> Result<(), YearShapeError> {
        if !YEAR_RANGE.contains(&self.year) {
            return Err(YearShapeError::YearOutOfRange(self.year));
        }
        if self.months.len() != 12 {
            return Err(YearShapeError::MonthCount(self.months.len()));
        }

        let mut seen = HashSet::new();
        for month in &self.months {
            let period = YearMonth::new(self.year, month.month_number)
                .map_err(|_| YearShapeError::InvalidMonthNumber(month.month_number))?;
            if !seen.insert(month.month_number) {
                return Err(YearShapeError::DuplicateMonth(month.month_number));
            }

            let stored: Vec<_> = month.days.iter().map(|d| d.iso_date).collect();
            if stored != period.days() {
                return Err(YearShapeError::DaysMismatch {
                    month: month.month_number,
                });
            }

            check_amounts(month)?;
        }

        Ok(())
    }
}

fn check_amounts(month: &MonthRecord) -> Result<(), YearShapeError> {
    let check = |field: &'static str, amount: Money| {
        if amount.is_storable() {
            Ok(())
        } else {
            Err(YearShapeError::InvalidAmount {
                month: month.month_number,
                field,
            })
        }
    };

    for day in &month.days {
        check("food amount", day.food_amount)?;
        check("going-out amount", day.going_out_amount)?;
    }
    for entry in &month.fixed_costs {
        check("fixed-cost planned amount", entry.planned_amount)?;
        check("fixed-cost actual amount", entry.actual_amount)?;
    }
    if let Some(budget) = month.fixed_budget_amount {
        check("fixed budget", budget)?;
    }
    for position in &month.variable_positions {
        check("position budget", position.budget_amount)?;
        check("position actual amount", position.actual_amount)?;
    }
    for entry in &month.variable_costs {
        check("variable cost", entry.amount)?;
    }
    for entry in &month.misc_costs {
        check("misc cost", entry.amount)?;
    }
    for entry in &month.incomes {
        check("income", entry.amount)?;
    }

    Ok(())
}
